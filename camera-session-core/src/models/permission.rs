/// Answer to a permission check from the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionResponse {
    pub granted: bool,

    /// Whether the platform will still show a prompt if asked.
    pub can_request: bool,
}

impl PermissionResponse {
    pub fn granted() -> Self {
        Self {
            granted: true,
            can_request: false,
        }
    }

    pub fn denied(can_request: bool) -> Self {
        Self {
            granted: false,
            can_request,
        }
    }
}

/// What the permission gate currently knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionStatus {
    /// The first check has not resolved yet.
    #[default]
    Loading,
    Granted,
    Denied { can_request: bool },
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl From<PermissionResponse> for PermissionStatus {
    fn from(response: PermissionResponse) -> Self {
        if response.granted {
            Self::Granted
        } else {
            Self::Denied {
                can_request: response.can_request,
            }
        }
    }
}
