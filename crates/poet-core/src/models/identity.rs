use uuid::Uuid;

/// Who is making the current request.
///
/// Only used to decide whether an owner is attached to new uploads and who
/// may delete them; never to authorize retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    Authenticated { user_id: Uuid },
}

impl Identity {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Identity::Authenticated { .. })
    }

    /// Owner reference to attach to records created by this caller.
    pub fn owner(&self) -> Option<Uuid> {
        match self {
            Identity::Anonymous => None,
            Identity::Authenticated { user_id } => Some(*user_id),
        }
    }
}
