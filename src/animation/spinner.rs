/// Braille dot frames shown while a project is being fetched
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Milliseconds each spinner frame stays on screen
const SPINNER_FRAME_MS: u64 = 80;

/// Get the spinner character for the given clock time
pub fn spinner_frame(now_ms: u64) -> char {
    let idx = (now_ms / SPINNER_FRAME_MS) as usize % SPINNER_FRAMES.len();
    SPINNER_FRAMES[idx]
}

/// Swipe hint drawn under an idle carousel, cycling outward from the center
const SWIPE_HINT_FRAMES: &[&str] = &["  ‹ · ›  ", " ‹‹ · ›› ", "‹‹‹ · ›››", " ‹‹ · ›› "];

const SWIPE_HINT_FRAME_MS: u64 = 250;

pub fn swipe_hint_frame(now_ms: u64) -> &'static str {
    let idx = (now_ms / SWIPE_HINT_FRAME_MS) as usize % SWIPE_HINT_FRAMES.len();
    SWIPE_HINT_FRAMES[idx]
}
