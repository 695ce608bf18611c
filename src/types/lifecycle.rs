// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptor lifecycle states reported to the hub manager.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Lifecycle of the adaptor process as seen by the hub manager.
///
/// The normal path is `stopped → starting → running`. `error` may only be
/// entered from `running`, and the only way out is an explicit
/// [`LifecycleAction::ClearError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptorState {
    /// Not started, or stopped by the manager.
    #[default]
    Stopped,
    /// Configured, waiting for applications to initialise.
    Starting,
    /// Serving applications.
    Running,
    /// Running but flagged as faulty.
    Error,
}

impl AdaptorState {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Error => "error",
        }
    }

    /// Computes the state reached by applying `action`.
    ///
    /// Returns `None` when the action is not allowed from this state.
    #[must_use]
    pub const fn transition(self, action: LifecycleAction) -> Option<Self> {
        match (self, action) {
            (_, LifecycleAction::Stop) => Some(Self::Stopped),
            (Self::Stopped | Self::Starting | Self::Running, LifecycleAction::Start) => {
                Some(Self::Starting)
            }
            (Self::Starting | Self::Running, LifecycleAction::Run) => Some(Self::Running),
            (Self::Running | Self::Error, LifecycleAction::Fail) => Some(Self::Error),
            (Self::Error | Self::Running, LifecycleAction::ClearError) => Some(Self::Running),
            _ => None,
        }
    }
}

impl fmt::Display for AdaptorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdaptorState {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stopped" => Ok(Self::Stopped),
            "starting" => Ok(Self::Starting),
            "running" => Ok(Self::Running),
            "error" => Ok(Self::Error),
            _ => Err(ValueError::InvalidAdaptorState(s.to_string())),
        }
    }
}

/// A request to move the adaptor through its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleAction {
    /// Configuration received.
    Start,
    /// An application finished initialisation.
    Run,
    /// Flag the adaptor as faulty.
    Fail,
    /// Clear a previous fault.
    ClearError,
    /// Stop the adaptor.
    Stop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_startup_path() {
        let s = AdaptorState::default();
        let s = s.transition(LifecycleAction::Start).unwrap();
        assert_eq!(s, AdaptorState::Starting);
        let s = s.transition(LifecycleAction::Run).unwrap();
        assert_eq!(s, AdaptorState::Running);
    }

    #[test]
    fn error_only_from_running() {
        assert_eq!(AdaptorState::Stopped.transition(LifecycleAction::Fail), None);
        assert_eq!(AdaptorState::Starting.transition(LifecycleAction::Fail), None);
        assert_eq!(
            AdaptorState::Running.transition(LifecycleAction::Fail),
            Some(AdaptorState::Error)
        );
    }

    #[test]
    fn clear_error_returns_to_running() {
        assert_eq!(
            AdaptorState::Error.transition(LifecycleAction::ClearError),
            Some(AdaptorState::Running)
        );
        assert_eq!(AdaptorState::Error.transition(LifecycleAction::Run), None);
        assert_eq!(AdaptorState::Stopped.transition(LifecycleAction::ClearError), None);
    }

    #[test]
    fn stop_always_allowed() {
        for s in [
            AdaptorState::Stopped,
            AdaptorState::Starting,
            AdaptorState::Running,
            AdaptorState::Error,
        ] {
            assert_eq!(s.transition(LifecycleAction::Stop), Some(AdaptorState::Stopped));
        }
    }

    #[test]
    fn wire_names_round_trip() {
        assert_eq!("running".parse::<AdaptorState>().unwrap(), AdaptorState::Running);
        assert_eq!(
            serde_json::to_string(&AdaptorState::Error).unwrap(),
            r#""error""#
        );
        assert!("paused".parse::<AdaptorState>().is_err());
    }
}
