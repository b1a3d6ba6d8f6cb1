/// Process-level error: a user-facing message plus the exit code `sips` returns.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

/// Failure of a single lookup.
///
/// These are terminal for the current lookup only. The `Display` output is the
/// message shown to the user, so validator and server messages pass through
/// verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Nothing was entered.
    EmptyInput,
    /// The identifier does not have the `ES` + 20 alphanumeric shape.
    Format,
    /// The remote call failed or returned a non-success status.
    ///
    /// `status` is `None` when no HTTP response was received at all.
    Transport { status: Option<u16>, message: String },
}

impl LookupError {
    /// Build a transport error for a non-success response.
    ///
    /// The server-provided message wins; otherwise a generic status message.
    pub fn from_status(status: u16, server_message: Option<String>) -> Self {
        let message = match server_message {
            Some(msg) if !msg.trim().is_empty() => msg,
            _ => format!("Error {status}"),
        };
        LookupError::Transport {
            status: Some(status),
            message,
        }
    }

    /// Build a transport error for a request that never produced a response.
    pub fn connection(detail: impl std::fmt::Display) -> Self {
        LookupError::Transport {
            status: None,
            message: format!("Error de conexión: {detail}"),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, LookupError::EmptyInput | LookupError::Format)
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::EmptyInput => write!(f, "Por favor, introduce un CUPS."),
            LookupError::Format => write!(
                f,
                "Formato de CUPS incorrecto. Debe ser ES + 20 caracteres."
            ),
            LookupError::Transport { message, .. } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<LookupError> for AppError {
    fn from(err: LookupError) -> Self {
        // Validation problems are usage errors; everything else is a failed lookup.
        let code = if err.is_validation() { 2 } else { 3 };
        AppError::new(code, err.to_string())
    }
}
