pub mod question;
pub mod quiz;
pub mod upload;

pub use question::{letter_to_index, Question, OPTION_COUNT, OPTION_LETTERS};
pub use quiz::{Eligibility, Quiz, QuizMeta};
pub use upload::{Upload, UploadKind};
