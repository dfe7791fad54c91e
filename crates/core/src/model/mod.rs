mod ids;
mod question;
mod quiz;
mod result;
mod score;
mod session;

pub use ids::{AnswerId, ParseIdError, QuestionId, QuizId};

pub use question::{Answer, Question, QuestionError, QuestionType};
pub use quiz::{Quiz, QuizError};
pub use result::{QuizResult, ResultError};
pub use score::{CELEBRATION_THRESHOLD, ScoreCard};
pub use session::{QuizSession, SessionError, SessionProgress, SessionState};
