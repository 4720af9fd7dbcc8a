//! Core types for voice-session-core
//!
//! Identifiers, call states, usecases and the small value types shared by the
//! registry, the transition engine and the backend adapters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::LookupError;

/// Number of concurrent voice call slots supported by the device
pub const MAX_VOICE_SESSIONS: usize = 4;

/// Voice session identifier (vsid)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Vsid(pub u32);

impl Vsid {
    pub const VOICE: Vsid = Vsid(0x10C0_1000);
    pub const VOICE2: Vsid = Vsid(0x10DC_1000);
    pub const VOLTE: Vsid = Vsid(0x10C0_2000);
    pub const QCHAT: Vsid = Vsid(0x1080_3000);
    /// Broadcast identifier. Never bound to a slot.
    pub const ALL: Vsid = Vsid(0xFFFF_FFFF);

    /// Raw numeric value
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Vsid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl From<Vsid> for u32 {
    fn from(vsid: Vsid) -> Self {
        vsid.0
    }
}

/// Call state of a voice session
///
/// Raw codes follow the audio HAL numbering, starting at 1 for `Inactive`.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum CallState {
    Inactive,
    Active,
    Hold,
    LocalHold,
}

impl CallState {
    /// All legal states, in raw-code order
    pub const ALL: [CallState; 4] = [
        CallState::Inactive,
        CallState::Active,
        CallState::Hold,
        CallState::LocalHold,
    ];

    /// Decode a raw call state value
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            1 => Some(CallState::Inactive),
            2 => Some(CallState::Active),
            3 => Some(CallState::Hold),
            4 => Some(CallState::LocalHold),
            _ => None,
        }
    }

    /// Raw call state value
    pub fn as_raw(&self) -> i32 {
        match self {
            CallState::Inactive => 1,
            CallState::Active => 2,
            CallState::Hold => 3,
            CallState::LocalHold => 4,
        }
    }

    /// Whether a session in this state occupies a call resource
    pub fn is_bearing(&self) -> bool {
        !matches!(self, CallState::Inactive)
    }
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CallState::Inactive => "INACTIVE",
            CallState::Active => "ACTIVE",
            CallState::Hold => "HOLD",
            CallState::LocalHold => "LOCAL_HOLD",
        };
        f.write_str(name)
    }
}

/// Audio HAL usecase backing a voice session
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Usecase {
    VoiceCall,
    Voice2Call,
    VolteCall,
    QChatCall,
}

impl fmt::Display for Usecase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Usecase::VoiceCall => "voice-call",
            Usecase::Voice2Call => "voice2-call",
            Usecase::VolteCall => "volte-call",
            Usecase::QChatCall => "qchat-call",
        };
        f.write_str(name)
    }
}

/// The statically supported kinds of voice session
///
/// Each kind owns exactly one registry slot, one vsid and one usecase.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum SessionKind {
    Voice,
    Voice2,
    Volte,
    QChat,
}

impl SessionKind {
    /// All kinds in registry slot order
    pub const ALL: [SessionKind; MAX_VOICE_SESSIONS] = [
        SessionKind::Voice,
        SessionKind::Voice2,
        SessionKind::Volte,
        SessionKind::QChat,
    ];

    /// Registry slot index, fixed for the life of the device
    pub fn slot(&self) -> usize {
        match self {
            SessionKind::Voice => 0,
            SessionKind::Voice2 => 1,
            SessionKind::Volte => 2,
            SessionKind::QChat => 3,
        }
    }

    /// Identifier the modem uses for this kind of call
    pub fn vsid(&self) -> Vsid {
        match self {
            SessionKind::Voice => Vsid::VOICE,
            SessionKind::Voice2 => Vsid::VOICE2,
            SessionKind::Volte => Vsid::VOLTE,
            SessionKind::QChat => Vsid::QCHAT,
        }
    }

    /// Audio usecase carrying this kind of call
    pub fn usecase(&self) -> Usecase {
        match self {
            SessionKind::Voice => Usecase::VoiceCall,
            SessionKind::Voice2 => Usecase::Voice2Call,
            SessionKind::Volte => Usecase::VolteCall,
            SessionKind::QChat => Usecase::QChatCall,
        }
    }

    /// Look up the kind bound to a registry slot
    pub fn from_slot(index: usize) -> Result<Self, LookupError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(LookupError::InvalidSessionIndex(index))
    }

    /// Look up the kind bound to an identifier; `None` for unknown or broadcast ids
    pub fn from_vsid(vsid: Vsid) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.vsid() == vsid)
    }

    /// Kind carried by a voice usecase
    pub fn from_usecase(usecase: Usecase) -> Self {
        match usecase {
            Usecase::VoiceCall => SessionKind::Voice,
            Usecase::Voice2Call => SessionKind::Voice2,
            Usecase::VolteCall => SessionKind::Volte,
            Usecase::QChatCall => SessionKind::QChat,
        }
    }
}

/// Opaque handle to the hardware control channel of a session
///
/// Owned by the resource-binding layer; the registry only keeps a copy.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ResourceHandle(pub u64);

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pcm-{}", self.0)
    }
}

/// Local call hold mode requested from the hardware control channel
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum LocalHoldMode {
    Start,
    Stop,
}

impl LocalHoldMode {
    /// Raw control value understood by the voice driver
    pub fn as_raw(&self) -> i32 {
        match self {
            LocalHoldMode::Start => 1,
            LocalHoldMode::Stop => 2,
        }
    }
}

/// Device-wide audio mode, owned by the routing layer
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Default, Serialize, Deserialize)]
pub enum AudioMode {
    #[default]
    Normal,
    Ringtone,
    InCall,
    InCommunication,
}

impl AudioMode {
    /// Whether the routing layer has put the device in a voice call
    pub fn is_in_call(&self) -> bool {
        matches!(self, AudioMode::InCall)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_state_raw_codes() {
        for state in CallState::ALL {
            assert_eq!(CallState::from_raw(state.as_raw()), Some(state));
        }
        assert_eq!(CallState::from_raw(0), None);
        assert_eq!(CallState::from_raw(5), None);
        assert_eq!(CallState::from_raw(-1), None);
    }

    #[test]
    fn test_session_kind_mapping_is_one_to_one() {
        for (index, kind) in SessionKind::ALL.iter().enumerate() {
            assert_eq!(kind.slot(), index);
            assert_eq!(SessionKind::from_slot(index).unwrap(), *kind);
            assert_eq!(SessionKind::from_vsid(kind.vsid()), Some(*kind));
            assert_eq!(SessionKind::from_usecase(kind.usecase()), *kind);
        }
        assert!(SessionKind::from_slot(MAX_VOICE_SESSIONS).is_err());
        assert_eq!(SessionKind::from_vsid(Vsid::ALL), None);
        assert_eq!(SessionKind::from_vsid(Vsid(0xDEAD)), None);
    }

    #[test]
    fn test_vsid_display_is_hex() {
        assert_eq!(Vsid::VOICE.to_string(), "0x10c01000");
    }
}
