//! Artifacts handed to the engine by the package extractor.

use crate::script::ParseOutcome;
use futures::future::BoxFuture;
use std::collections::BTreeSet;
use std::fmt;
use xpiguard_types::PackagePath;

/// One extracted package artifact, tagged with its kind.
#[derive(Debug)]
pub enum Artifact {
    Script {
        path: PackagePath,
        input: ScriptInput,
    },
    Manifest {
        path: PackagePath,
        tags: Vec<ManifestTag>,
    },
    Markup {
        path: PackagePath,
        elements: Vec<MarkupElement>,
    },
    LegacyMetadata {
        path: PackagePath,
        type_code: i64,
        line: Option<u32>,
    },
}

impl Artifact {
    pub fn path(&self) -> &PackagePath {
        match self {
            Artifact::Script { path, .. }
            | Artifact::Manifest { path, .. }
            | Artifact::Markup { path, .. }
            | Artifact::LegacyMetadata { path, .. } => path,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        match self {
            Artifact::Script { .. } => ArtifactKind::Script,
            Artifact::Manifest { .. } => ArtifactKind::Manifest,
            Artifact::Markup { .. } => ArtifactKind::Markup,
            Artifact::LegacyMetadata { .. } => ArtifactKind::LegacyMetadata,
        }
    }

    /// A script whose parse outcome is already known.
    pub fn parsed_script(path: impl Into<PackagePath>, outcome: ParseOutcome) -> Self {
        Artifact::Script {
            path: path.into(),
            input: ScriptInput::Parsed(outcome),
        }
    }

    /// A script whose parse outcome is produced when the scan awaits it.
    pub fn deferred_script(
        path: impl Into<PackagePath>,
        outcome: BoxFuture<'static, ParseOutcome>,
    ) -> Self {
        Artifact::Script {
            path: path.into(),
            input: ScriptInput::Deferred(outcome),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    Script,
    Manifest,
    Markup,
    LegacyMetadata,
}

/// The parser collaborator's result for a script, available now or later.
pub enum ScriptInput {
    Parsed(ParseOutcome),
    Deferred(BoxFuture<'static, ParseOutcome>),
}

impl fmt::Debug for ScriptInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptInput::Parsed(Ok(tree)) => f
                .debug_struct("Parsed")
                .field("nodes", &tree.len())
                .finish(),
            ScriptInput::Parsed(Err(failure)) => f.debug_tuple("Failed").field(failure).finish(),
            ScriptInput::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

/// A declarative manifest tag as found in install metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestTag {
    pub name: String,
    pub value: Option<String>,
    pub line: Option<u32>,
}

impl ManifestTag {
    pub fn new(name: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            name: name.into(),
            value: None,
            line,
        }
    }
}

/// One element occurrence in declarative markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarkupElement {
    pub tag: String,
    pub attributes: BTreeSet<String>,
    pub line: Option<u32>,
}
