//! Fixture types a conformance case is instantiated for
//!
//! Every case runs once per fixture type: a client version paired with the
//! renderer the driver is asked to use.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Renderer requested from the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Renderer {
    /// Direct3D 9 backend
    D3D9,
    /// Direct3D 11 backend
    D3D11,
}

impl Renderer {
    /// Short display name
    pub const fn name(self) -> &'static str {
        match self {
            Self::D3D9 => "D3D9",
            Self::D3D11 => "D3D11",
        }
    }
}

/// Client API version of the context
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClientVersion {
    /// OpenGL ES 2.0
    Gles2,
    /// OpenGL ES 3.0
    Gles3,
}

impl ClientVersion {
    /// Major version number
    pub const fn major(self) -> u32 {
        match self {
            Self::Gles2 => 2,
            Self::Gles3 => 3,
        }
    }
}

/// One (client version, renderer) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureType {
    /// Client version of the context
    pub client_version: ClientVersion,
    /// Renderer backing the context
    pub renderer: Renderer,
}

impl FixtureType {
    /// Create a fixture type
    pub const fn new(client_version: ClientVersion, renderer: Renderer) -> Self {
        Self {
            client_version,
            renderer,
        }
    }
}

impl fmt::Display for FixtureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ES{}_{}", self.client_version.major(), self.renderer.name())
    }
}

/// Fixture types most cases run against
pub const STANDARD_FIXTURES: [FixtureType; 2] = [
    FixtureType::new(ClientVersion::Gles2, Renderer::D3D11),
    FixtureType::new(ClientVersion::Gles2, Renderer::D3D9),
];

/// Fixture types for cases that need an ES3 context
pub const ES3_FIXTURES: [FixtureType; 1] = [FixtureType::new(ClientVersion::Gles3, Renderer::D3D11)];

/// Expand a list of case names into one instantiation per fixture type
pub fn instantiate<'a>(
    cases: &'a [&'a str],
    fixtures: &'a [FixtureType],
) -> impl Iterator<Item = (String, FixtureType)> + 'a {
    fixtures.iter().flat_map(move |fixture| {
        cases
            .iter()
            .map(move |case| (format!("{fixture}/{case}"), *fixture))
    })
}
