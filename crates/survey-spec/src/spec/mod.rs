pub mod question;

pub use question::{QuestionSpec, QuestionType, normalize, normalize_all};
