//! Model-facing layer: the gateway contract, its Gemini REST
//! implementation, image transcription, and the tutor prompt policy.

pub mod extraction;
pub mod gateway;
pub mod gemini;
pub mod policy;
pub mod prompts;

pub use gateway::{ImageData, ModelGateway};
pub use gemini::GeminiGateway;
pub use policy::TutorPolicy;
