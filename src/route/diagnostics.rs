// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Joe Pearson
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How bad a parsing diagnostic is.
///
/// Info means the token was recognized structurally but could not be
/// resolved; Error means it is ill-formed or unresolvable.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParsingErrorLevel {
    Info,
    Error,
}

/// What went wrong with a token.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ParsingErrorKind {
    RouteEmpty,
    UnknownWaypoint,
    UnknownProcedure,
    ProcedureRunwayMismatch,
    InvalidRunway,
    UnknownAirway,
    InvalidAirwayDirection,
    InvalidAirwayFormat,
    AirwayFixNotFound,
    InsufficientFlightLevel,
    InvalidData,
}

impl fmt::Display for ParsingErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RouteEmpty => "route empty",
            Self::UnknownWaypoint => "unknown waypoint",
            Self::UnknownProcedure => "unknown procedure",
            Self::ProcedureRunwayMismatch => "procedure runway mismatch",
            Self::InvalidRunway => "invalid runway",
            Self::UnknownAirway => "unknown airway",
            Self::InvalidAirwayDirection => "invalid airway direction",
            Self::InvalidAirwayFormat => "invalid airway format",
            Self::AirwayFixNotFound => "airway fix not found",
            Self::InsufficientFlightLevel => "insufficient flight level",
            Self::InvalidData => "invalid data",
        };
        write!(f, "{name}")
    }
}

/// A diagnostic tied to the token that produced it.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParsingError {
    pub kind: ParsingErrorKind,
    pub message: String,
    pub token_index: usize,
    pub token: String,
    pub level: ParsingErrorLevel,
}

impl ParsingError {
    pub fn new(
        kind: ParsingErrorKind,
        message: impl Into<String>,
        token_index: usize,
        token: impl Into<String>,
        level: ParsingErrorLevel,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            token_index,
            token: token.into(),
            level,
        }
    }

    /// Whether two diagnostics mean the same problem. The message and level
    /// do not participate; kind, position and token do.
    pub fn is_duplicate_of(&self, other: &ParsingError) -> bool {
        self.kind == other.kind
            && self.token_index == other.token_index
            && self.token == other.token
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at token {} ({:?}): {}",
            self.kind, self.token_index, self.token, self.message
        )
    }
}

/// Appends the error unless an equal record already exists.
pub(crate) fn push_unique(errors: &mut Vec<ParsingError>, error: ParsingError) {
    if !errors.iter().any(|e| e.is_duplicate_of(&error)) {
        errors.push(error);
    }
}
