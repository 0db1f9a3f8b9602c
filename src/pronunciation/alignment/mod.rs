pub mod dtw;
pub mod edit;
pub mod phonemes;

pub use dtw::{AcousticAligner, AlignmentPath, DtwAlignment};
pub use edit::{levenshtein, levenshtein_str};
pub use phonemes::{align_symbols, PhonemeAligner, PhonemeAlignment};
