//! 2x2 strobe/sense keypad matrix decoder.
//!
//! Four buttons share two drive lines and two sense lines:
//!
//! | | drive 1 | drive 2 |
//! |---|---|---|
//! | **sense 1** | S1 (weight 1) | S2 (weight 2) |
//! | **sense 2** | S3 (weight 3) | S4 (weight 4) |
//!
//! The button task toggles the drive lines; the decoder only looks at which
//! drive line is active at the moment a sense line fires. A press is only
//! seen while its drive line is active, so detection depends on human
//! timing.

use crate::config::BUTTON_RESET_THRESHOLD;
use crate::shared::SharedState;

// =============================================================================
// Keypad Lines
// =============================================================================

/// Output line of the matrix, toggled by the button task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriveLine {
    One,
    Two,
}

impl DriveLine {
    /// Bit of this line in the drive-phase mirror.
    #[inline]
    pub(crate) const fn mask(self) -> u8 {
        match self {
            Self::One => 0b01,
            Self::Two => 0b10,
        }
    }
}

/// Input line of the matrix, edge-interrupt capable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SenseLine {
    One,
    Two,
}

// =============================================================================
// Buttons
// =============================================================================

/// One of the four logical buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    S1,
    S2,
    S3,
    S4,
}

impl Button {
    pub const ALL: [Self; 4] = [Self::S1, Self::S2, Self::S3, Self::S4];

    /// Amount added to this button's accumulator per detected press.
    #[inline]
    pub const fn weight(self) -> u8 {
        match self {
            Self::S1 => 1,
            Self::S2 => 2,
            Self::S3 => 3,
            Self::S4 => 4,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::S1 => 0,
            Self::S2 => 1,
            Self::S3 => 2,
            Self::S4 => 3,
        }
    }

    /// Matrix position of this button.
    pub const fn lines(self) -> (DriveLine, SenseLine) {
        match self {
            Self::S1 => (DriveLine::One, SenseLine::One),
            Self::S2 => (DriveLine::Two, SenseLine::One),
            Self::S3 => (DriveLine::One, SenseLine::Two),
            Self::S4 => (DriveLine::Two, SenseLine::Two),
        }
    }

    /// Decode a sense-line edge given the drive lines active at that moment.
    ///
    /// Drive line 1 wins if both are active. Returns `None` for a spurious
    /// edge with no active drive line.
    pub const fn decode(
        sense: SenseLine,
        drive_one: bool,
        drive_two: bool,
    ) -> Option<Self> {
        match (sense, drive_one, drive_two) {
            (SenseLine::One, true, _) => Some(Self::S1),
            (SenseLine::One, false, true) => Some(Self::S2),
            (SenseLine::Two, true, _) => Some(Self::S3),
            (SenseLine::Two, false, true) => Some(Self::S4),
            (_, false, false) => None,
        }
    }
}

// =============================================================================
// Accumulator State
// =============================================================================

/// The four weighted accumulators as one value.
///
/// The combined indicator is always the sum of the accumulators; it is
/// derived, never stored, so the two cannot disagree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ButtonState {
    accumulators: [u8; 4],
}

impl ButtonState {
    /// All accumulators at zero.
    pub const ZERO: Self = Self { accumulators: [0; 4] };

    /// Build a state from explicit accumulator values.
    pub const fn from_accumulators(accumulators: [u8; 4]) -> Self { Self { accumulators } }

    /// Accumulator of one button.
    #[inline]
    pub const fn accumulator(
        &self,
        button: Button,
    ) -> u8 {
        self.accumulators[button.index()]
    }

    /// All four accumulators, S1 first.
    #[inline]
    pub const fn accumulators(&self) -> [u8; 4] { self.accumulators }

    /// Combined indicator: sum of all accumulators.
    #[inline]
    pub fn indicator(&self) -> u32 { self.accumulators.iter().map(|&a| u32::from(a)).sum() }

    /// State after one detected press of `button`.
    ///
    /// Adds the button's weight, then resets everything to zero if the new
    /// indicator reaches [`BUTTON_RESET_THRESHOLD`].
    #[must_use]
    pub fn press(
        self,
        button: Button,
    ) -> Self {
        let mut next = self;
        let slot = &mut next.accumulators[button.index()];
        *slot = slot.saturating_add(button.weight());
        if next.indicator() >= u32::from(BUTTON_RESET_THRESHOLD) {
            Self::ZERO
        } else {
            next
        }
    }

    /// Pack into one word, one byte per accumulator (S1 in the low byte).
    #[inline]
    pub const fn pack(self) -> u32 { u32::from_le_bytes(self.accumulators) }

    /// Inverse of [`pack`](Self::pack).
    #[inline]
    pub const fn unpack(word: u32) -> Self {
        Self {
            accumulators: word.to_le_bytes(),
        }
    }
}

// =============================================================================
// Decoder
// =============================================================================

/// Edge-interrupt handler body for the two sense lines.
pub struct KeypadDecoder<'a> {
    shared: &'a SharedState,
}

impl<'a> KeypadDecoder<'a> {
    pub const fn new(shared: &'a SharedState) -> Self { Self { shared } }

    /// Handle an edge on `sense`.
    ///
    /// Reads the current drive phase, credits the identified button and
    /// applies the reset law in one atomic update. Returns the decoded
    /// button, or `None` if no drive line was active (the edge is ignored).
    pub fn on_edge(
        &self,
        sense: SenseLine,
    ) -> Option<Button> {
        let drive_one = self.shared.drive_active(DriveLine::One);
        let drive_two = self.shared.drive_active(DriveLine::Two);
        let button = Button::decode(sense, drive_one, drive_two)?;
        self.shared.apply_press(button);
        Some(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(
        mut state: ButtonState,
        presses: &[Button],
    ) -> ButtonState {
        for &b in presses {
            state = state.press(b);
        }
        state
    }

    #[test]
    fn test_weights() {
        let weights: [u8; 4] = Button::ALL.map(Button::weight);
        assert_eq!(weights, [1, 2, 3, 4]);
    }

    #[test]
    fn test_decode_truth_table() {
        assert_eq!(Button::decode(SenseLine::One, true, false), Some(Button::S1));
        assert_eq!(Button::decode(SenseLine::One, false, true), Some(Button::S2));
        assert_eq!(Button::decode(SenseLine::Two, true, false), Some(Button::S3));
        assert_eq!(Button::decode(SenseLine::Two, false, true), Some(Button::S4));
    }

    #[test]
    fn test_decode_matches_matrix_position() {
        for button in Button::ALL {
            let (drive, sense) = button.lines();
            let decoded = Button::decode(sense, drive == DriveLine::One, drive == DriveLine::Two);
            assert_eq!(decoded, Some(button));
        }
    }

    #[test]
    fn test_decode_spurious_edge() {
        assert_eq!(Button::decode(SenseLine::One, false, false), None);
        assert_eq!(Button::decode(SenseLine::Two, false, false), None);
    }

    #[test]
    fn test_decode_both_drive_lines_prefers_line_one() {
        assert_eq!(Button::decode(SenseLine::One, true, true), Some(Button::S1));
        assert_eq!(Button::decode(SenseLine::Two, true, true), Some(Button::S3));
    }

    #[test]
    fn test_s1_three_times_then_s2() {
        let state = press_all(ButtonState::ZERO, &[Button::S1, Button::S1, Button::S1, Button::S2]);
        assert_eq!(state.accumulators(), [3, 2, 0, 0]);
        assert_eq!(state.indicator(), 5);
    }

    #[test]
    fn test_reset_when_sum_reaches_threshold() {
        // 97 = 9*1 + 8*2 + 8*3 + 12*4
        let state = ButtonState::from_accumulators([9, 16, 24, 48]);
        assert_eq!(state.indicator(), 97);

        let next = state.press(Button::S4);
        assert_eq!(next, ButtonState::ZERO, "101 >= 100 must reset all");
        assert_eq!(next.indicator(), 0);
    }

    #[test]
    fn test_reset_at_exactly_threshold() {
        let state = ButtonState::from_accumulators([0, 0, 0, 96]);
        assert_eq!(state.press(Button::S4), ButtonState::ZERO);
    }

    #[test]
    fn test_no_reset_just_below_threshold() {
        let state = ButtonState::from_accumulators([0, 0, 0, 95]);
        let next = state.press(Button::S4);
        assert_eq!(next.indicator(), 99);
        assert_eq!(next.accumulator(Button::S4), 99);
    }

    #[test]
    fn test_indicator_is_idempotent_without_presses() {
        let state = press_all(ButtonState::ZERO, &[Button::S3, Button::S2, Button::S4]);
        let x = state.indicator();
        for _ in 0..10 {
            assert_eq!(state.indicator(), x);
        }
        assert_eq!(x, 9);
    }

    #[test]
    fn test_indicator_never_reaches_threshold() {
        // Long deterministic press sequence; every intermediate state stays below 100
        let mut state = ButtonState::ZERO;
        let mut seed = 0x2545_f491_u32;
        for _ in 0..10_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let button = Button::ALL[(seed % 4) as usize];
            let before = state.indicator();
            state = state.press(button);
            let expected = before + u32::from(button.weight());
            if expected >= 100 {
                assert_eq!(state, ButtonState::ZERO);
            } else {
                assert_eq!(state.indicator(), expected);
            }
        }
    }

    #[test]
    fn test_pack_layout() {
        let state = ButtonState::from_accumulators([1, 2, 3, 4]);
        assert_eq!(state.pack(), 0x0403_0201);
        assert_eq!(ButtonState::unpack(0x0403_0201), state);
    }

    #[test]
    fn test_decoder_uses_current_drive_phase() {
        let shared = SharedState::new();
        let decoder = KeypadDecoder::new(&shared);

        shared.set_drive(DriveLine::One, true);
        shared.set_drive(DriveLine::Two, false);
        assert_eq!(decoder.on_edge(SenseLine::One), Some(Button::S1));
        assert_eq!(decoder.on_edge(SenseLine::Two), Some(Button::S3));

        shared.set_drive(DriveLine::One, false);
        shared.set_drive(DriveLine::Two, true);
        assert_eq!(decoder.on_edge(SenseLine::One), Some(Button::S2));
        assert_eq!(decoder.on_edge(SenseLine::Two), Some(Button::S4));

        assert_eq!(shared.buttons().accumulators(), [1, 2, 3, 4]);
        assert_eq!(shared.buttons().indicator(), 10);
    }

    #[test]
    fn test_decoder_ignores_edge_without_drive() {
        let shared = SharedState::new();
        let decoder = KeypadDecoder::new(&shared);
        shared.set_drive(DriveLine::One, false);
        shared.set_drive(DriveLine::Two, false);

        assert_eq!(decoder.on_edge(SenseLine::One), None);
        assert_eq!(decoder.on_edge(SenseLine::Two), None);
        assert_eq!(shared.buttons(), ButtonState::ZERO);
    }
}
