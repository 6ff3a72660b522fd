pub mod client_config;
pub mod envelope;
pub mod json_error;
pub mod login;
pub mod pagination;
pub mod register;
pub mod samples;
pub mod user;
pub mod workflow;

pub use self::client_config::{ApiConfig, AppConfig, ConfigError, RoutesConfig, StorageConfig};
pub use self::envelope::{ApiResponse, SUCCESS_CODE};
pub use self::json_error::ErrorBody;
pub use self::login::{LoginData, LoginPayload, LogoutData};
pub use self::pagination::{ListQuery, Page};
pub use self::register::RegistrationData;
pub use self::samples::{ClientRecord, CommissionRecord, CommissionStatus, ReceiveRecord};
pub use self::user::{ChangePasswordData, Department, ResetPasswordData, Role, UserProfile};
pub use self::workflow::{AssignData, TransitionData, WorkflowStatus};
