/// Reference resolution module.
///
/// Resolves extracted mentions into graph edges by looking them up in the
/// corpus index, after exempting built-in runtime names.
mod allowlist;
mod index;
mod resolver;

pub use allowlist::{AllowList, BUILTIN_MODELS, BUILTIN_SUBAGENT_TYPES};
pub use index::CorpusIndex;
pub use resolver::{ReferenceResolver, Resolution, ResolutionResult, ResolvedMention};
