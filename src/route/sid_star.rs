// SPDX-License-Identifier: Apache-2.0
// Copyright 2025, 2026 Joe Pearson
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

use super::diagnostics::{ParsingError, ParsingErrorKind, ParsingErrorLevel};
use super::token;
use crate::nd::{Procedure, ProcedureKind, ProcedureStore};

/// What a procedure/runway token resolved to.
///
/// `procedure` and `runway` are the textual findings; `extracted` is set
/// when the procedure actually exists in the dataset. Diagnostics explain
/// partial results.
#[derive(Clone, PartialEq, Debug, Default)]
pub(crate) struct FoundProcedure {
    pub procedure: Option<String>,
    pub runway: Option<String>,
    pub extracted: Option<Procedure>,
    pub errors: Vec<ParsingError>,
}

/// Resolves a SID/STAR token like `ABBEY3A/07R`, `SNTNA2` or `KSFO/28L`
/// against the procedures of the anchor airport.
pub(crate) fn find_procedure(
    store: &ProcedureStore,
    token: &str,
    anchor_icao: &str,
    kind: ProcedureKind,
    token_index: usize,
) -> FoundProcedure {
    let runway = token::runway_designator(token).map(str::to_string);
    let procedure_token = match runway {
        Some(_) => token.split('/').next().unwrap_or(token),
        None => token,
    };

    // A four letter left side next to a runway is an airport code, not a
    // procedure name. Only the anchor airport itself is acceptable there.
    if runway.is_some() && procedure_token.len() == 4 {
        if procedure_token == anchor_icao {
            return FoundProcedure {
                procedure: Some(procedure_token.to_string()),
                runway,
                extracted: None,
                errors: Vec::new(),
            };
        }

        return FoundProcedure {
            errors: vec![ParsingError::new(
                ParsingErrorKind::InvalidRunway,
                format!(
                    "Expected runway for {anchor_icao} but found a runway for {procedure_token}"
                ),
                token_index,
                token,
                ParsingErrorLevel::Error,
            )],
            ..Default::default()
        };
    }

    let matching = store.find_matching(anchor_icao, kind, procedure_token);

    if matching.is_empty() {
        return FoundProcedure {
            procedure: Some(procedure_token.to_string()),
            runway,
            extracted: None,
            errors: vec![ParsingError::new(
                ParsingErrorKind::UnknownProcedure,
                format!("No matching procedure found for {procedure_token} at {anchor_icao}"),
                token_index,
                procedure_token,
                ParsingErrorLevel::Info,
            )],
        };
    }

    if let Some(runway) = runway {
        if let Some(procedure) = matching.iter().find(|p| p.runway == runway) {
            return FoundProcedure {
                procedure: Some(procedure.name.clone()),
                runway: Some(runway),
                extracted: Some((*procedure).clone()),
                errors: Vec::new(),
            };
        }

        // The filed runway does not belong to any variant of the procedure;
        // keep the first variant but flag the mismatch.
        return FoundProcedure {
            procedure: Some(matching[0].name.clone()),
            runway: Some(runway.clone()),
            extracted: Some(matching[0].clone()),
            errors: vec![ParsingError::new(
                ParsingErrorKind::ProcedureRunwayMismatch,
                format!(
                    "No matching runway {runway} found for procedure {procedure_token} at {anchor_icao}"
                ),
                token_index,
                procedure_token,
                ParsingErrorLevel::Error,
            )],
        };
    }

    FoundProcedure {
        procedure: Some(matching[0].name.clone()),
        runway: None,
        extracted: Some(matching[0].clone()),
        errors: Vec::new(),
    }
}
