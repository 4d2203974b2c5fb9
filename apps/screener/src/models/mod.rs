pub mod resume;
pub mod user;

pub use resume::{
    RankRequest, RankResponse, RankedCandidate, ResumeRecord, SelectedFile, UploadResponse,
};
pub use user::{
    LoginRequest, LoginResponse, NotificationRequest, SignupRequest, SignupResponse,
};
