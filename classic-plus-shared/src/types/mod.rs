mod pin;
mod survey;
mod survey_results;
mod user_vote;
mod vote;
mod vote_transition;
mod voter_key;
mod votes_count;

pub use pin::{NewPin, Pin, PinCategory, PinId};
pub use survey::{QuestionKind, SurveyDefinition, SurveyEntry, SurveyQuestion, SurveyResponses, SurveySection};
pub use survey_results::{AnswerCounts, SurveyResults};
pub use user_vote::UserVote;
pub use vote::VoteDirection;
pub use vote_transition::VoteTransition;
pub use voter_key::VoterKey;
pub use votes_count::{VoteReceipt, VotesCount};
