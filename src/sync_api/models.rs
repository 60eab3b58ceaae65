use poem_openapi::{ApiResponse, Object, payload::Json};

#[derive(Debug, Clone, Object)]
pub struct ErrorDto {
    /// Human-readable error message
    pub message: String,
}

impl From<String> for ErrorDto {
    fn from(message: String) -> Self {
        ErrorDto { message }
    }
}

impl From<&str> for ErrorDto {
    fn from(message: &str) -> Self {
        ErrorDto {
            message: message.to_string(),
        }
    }
}

// ===== Requests =====

/// Registration body; presence of both fields is validated by the
/// service, not the deserializer, so a partial body yields 400 rather
/// than a framework-shaped error.
#[derive(Debug, Clone, Object)]
pub struct UserCreateRequestDto {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Progress-write body. All five fields are required by the protocol,
/// but a missing one surfaces as 500 (documented legacy contract).
#[derive(Debug, Clone, Object)]
pub struct ProgressUpdateRequestDto {
    pub document: Option<String>,
    pub progress: Option<String>,
    pub percentage: Option<f64>,
    pub device: Option<String>,
    pub device_id: Option<String>,
}

// ===== Responses =====

#[derive(Debug, Clone, Object)]
pub struct RegisteredDto {
    pub username: String,
}

#[derive(Debug, Clone, Object)]
pub struct AuthorizedDto {
    pub authorized: String,
}

#[derive(Debug, Clone, Object)]
pub struct ProgressUpdatedDto {
    pub document: String,
    /// Server-assigned Unix seconds
    pub timestamp: i64,
}

#[derive(Debug, Clone, Object)]
pub struct ProgressDto {
    pub username: String,
    pub document: String,
    pub progress: String,
    pub percentage: f64,
    pub device: String,
    pub device_id: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Object)]
pub struct HealthDto {
    pub message: String,
}

#[derive(ApiResponse)]
pub enum RegisterResponseDto {
    /// User created
    #[oai(status = 201)]
    Created(Json<RegisteredDto>),

    /// Missing username or password
    #[oai(status = 400)]
    BadRequest(Json<ErrorDto>),

    /// Registrations are disabled on this server
    #[oai(status = 403)]
    Forbidden(Json<ErrorDto>),

    /// Username is already registered
    #[oai(status = 409)]
    Conflict(Json<ErrorDto>),

    /// Store failure
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum AuthResponseDto {
    /// Credentials match
    #[oai(status = 200)]
    Ok(Json<AuthorizedDto>),

    /// Missing credentials or wrong secret for a known user
    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    /// Unknown username
    #[oai(status = 403)]
    Forbidden(Json<ErrorDto>),

    /// Store failure
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum UpdateProgressResponseDto {
    /// Progress stored; returns the server-assigned timestamp
    #[oai(status = 200)]
    Ok(Json<ProgressUpdatedDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 403)]
    Forbidden(Json<ErrorDto>),

    /// Malformed payload or store failure
    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum GetProgressResponseDto {
    /// The stored record
    #[oai(status = 200)]
    Ok(Json<ProgressDto>),

    #[oai(status = 401)]
    Unauthorized(Json<ErrorDto>),

    #[oai(status = 403)]
    Forbidden(Json<ErrorDto>),

    /// No progress stored for this (user, document) pair
    #[oai(status = 404)]
    NotFound(Json<ErrorDto>),

    #[oai(status = 500)]
    InternalError(Json<ErrorDto>),
}

#[derive(ApiResponse)]
pub enum HealthResponseDto {
    /// Liveness probe
    #[oai(status = 200)]
    Ok(Json<HealthDto>),
}

#[derive(ApiResponse)]
pub enum RootResponseDto {
    /// Redirect to /healthstatus
    #[oai(status = 307)]
    TemporaryRedirect(#[oai(header = "Location")] String),
}
