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
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading navigation data.
///
/// These cover the startup path only: opening databases, validating their
/// schema and reading data files. Problems found while parsing a route string
/// are not errors in this sense; they are reported as
/// [`ParsingError`](crate::route::ParsingError) records inside the parse
/// result.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Error {
    /// An I/O error while reading a data file.
    Io(String),
    /// An error from the SQLite layer.
    Sqlite(String),
    /// A required table is missing from a database.
    MissingTable { table: &'static str },
    /// A required column is missing from a database table.
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
    /// An airway file contained no single valid record.
    NoAirwayData,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Sqlite(e) => write!(f, "SQLite error: {e}"),
            Self::MissingTable { table } => write!(f, "required table not found: {table}"),
            Self::MissingColumn { table, column } => {
                write!(f, "required column {column} not found in table {table}")
            }
            Self::NoAirwayData => write!(f, "airway file contains no valid records"),
        }
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e.to_string())
    }
}
