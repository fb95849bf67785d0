//! Per-client session state.
//!
//! The negotiated protocol version, the server-assigned session id and the
//! initialized flag change together, exactly once, when the handshake
//! completes. Callers work from a [`SessionSnapshot`] and hand a finished
//! snapshot back through [`Session::commit`], so a failed or cancelled
//! handshake never leaves half-written state behind.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::error::{ClientError, ClientResult};

/// Header values attached to an outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Value of `MCP-Protocol-Version`
    pub protocol_version: String,
    /// Value of `Mcp-Session-Id`, once assigned
    pub session_id: Option<String>,
}

impl SessionSnapshot {
    /// Session id if one was assigned and is non-empty
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref().filter(|sid| !sid.is_empty())
    }
}

#[derive(Debug)]
struct SessionState {
    protocol_version: String,
    session_id: Option<String>,
    initialized: bool,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            protocol_version: self.protocol_version.clone(),
            session_id: self.session_id.clone(),
        }
    }
}

/// Session owned by one [`ProtocolClient`](crate::ProtocolClient).
#[derive(Debug)]
pub struct Session {
    state: RwLock<SessionState>,
    next_id: AtomicU64,
}

impl Session {
    /// Fresh, uninitialized session advertising `protocol_version`
    pub fn new(protocol_version: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(SessionState {
                protocol_version: protocol_version.into(),
                session_id: None,
                initialized: false,
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Allocate the next request id. Ids start at 1 and are never reused.
    pub fn next_request_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Current header values
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.read().snapshot()
    }

    /// Snapshot of an initialized session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotInitialized`] before [`commit`](Self::commit).
    pub fn ready_snapshot(&self) -> ClientResult<SessionSnapshot> {
        let state = self.state.read();
        if !state.initialized {
            return Err(ClientError::NotInitialized);
        }
        Ok(state.snapshot())
    }

    /// Whether the handshake has completed
    pub fn is_initialized(&self) -> bool {
        self.state.read().initialized
    }

    /// Negotiated (or default) protocol version
    pub fn protocol_version(&self) -> String {
        self.state.read().protocol_version.clone()
    }

    /// Server-assigned session id, if any
    pub fn session_id(&self) -> Option<String> {
        self.state.read().session_id.clone()
    }

    /// Install the negotiated values and mark the session initialized.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Handshake`] if another handshake already
    /// committed; the stored values are left untouched in that case.
    pub fn commit(&self, negotiated: SessionSnapshot) -> ClientResult<()> {
        let mut state = self.state.write();
        if state.initialized {
            return Err(ClientError::Handshake("already initialized".to_string()));
        }
        state.protocol_version = negotiated.protocol_version;
        state.session_id = negotiated.session_id;
        state.initialized = true;
        Ok(())
    }
}
