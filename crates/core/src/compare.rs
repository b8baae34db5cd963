use std::collections::HashSet;

use crate::duplicate;
use crate::error::Result;
use crate::fingerprint::{self, Fingerprint};
use crate::normalize::{self, NormalizeMode};
use crate::reduce;
use crate::score;
use crate::source::{self, SourceInput, SourceUnit};
use crate::syntax::{self, CstGraph};
use crate::types::{DuplicationReport, Options, SimilarityOutcome, Target};

/// Structural similarity between a reference unit and one candidate or a list
/// of candidates. Each comparison is a pure function of its inputs; nothing
/// is carried over between calls.
pub fn similarity(reference: &SourceInput, target: &Target, options: &Options) -> Result<SimilarityOutcome> {
    options.validate()?;

    // Input-shape and read errors surface before any parsing work.
    let unit_a = source::load_unit(reference, options)?;
    let candidates = match target {
        Target::Single(input) => vec![source::load_unit(input, options)?],
        Target::Many(inputs) => source::load_many(inputs, options)?,
    };

    let set_a = similarity_fingerprints(&unit_a, options)?;

    let mut scores = Vec::with_capacity(candidates.len());
    for (index, unit) in candidates.iter().enumerate() {
        let set_b = similarity_fingerprints(unit, options)
            .map_err(|err| err.for_candidate(index))?;
        scores.push(score::score(&set_a, &set_b));
    }

    match target {
        Target::Single(_) => Ok(SimilarityOutcome {
            score: scores[0],
            best_index: Some(0),
            best_match: Some(candidates[0].raw.clone()),
        }),
        Target::Many(_) => {
            let (best, best_index) = score::best_of(scores);
            Ok(SimilarityOutcome {
                score: best,
                best_index,
                best_match: best_index.map(|index| candidates[index].raw.clone()),
            })
        }
    }
}

/// Literal duplicated regions between two units, located by aligning their
/// raw leaf-token streams. Independent of the fingerprinting path: tokens
/// keep their original text and namespace qualifiers so the report quotes
/// the source faithfully.
pub fn duplication(a: &SourceInput, b: &SourceInput, options: &Options) -> Result<DuplicationReport> {
    options.validate()?;

    let unit_a = source::load_unit(a, options)?;
    let unit_b = source::load_unit(b, options)?;

    let tokens_a = duplication_tokens(&unit_a, options)?;
    let tokens_b = duplication_tokens(&unit_b, options)?;

    Ok(duplicate::align(&tokens_a, &tokens_b))
}

/// Node/edge lists of the unit's concrete syntax tree, for external tree
/// renderers. The unit is parsed as given, without normalization.
pub fn cst_graph(input: &SourceInput, options: &Options) -> Result<CstGraph> {
    options.validate()?;
    let unit = source::load_unit(input, options)?;
    let tree = syntax::parse(&unit.raw)?;
    Ok(syntax::cst_graph(&tree, &unit.raw))
}

fn similarity_fingerprints(unit: &SourceUnit, options: &Options) -> Result<HashSet<Fingerprint>> {
    let normalized = normalize::normalize(&unit.raw, NormalizeMode::Full, options)?;
    let tree = syntax::parse(&normalized)?;
    let tags = reduce::tag_sequence(tree.root_node());
    Ok(fingerprint::winnow(&tags, options.kgram_len, options.window_size))
}

fn duplication_tokens(unit: &SourceUnit, options: &Options) -> Result<Vec<syntax::LeafToken>> {
    let expanded = normalize::normalize(&unit.raw, NormalizeMode::Expanded, options)?;
    let tree = syntax::parse(&expanded)?;
    Ok(syntax::leaf_tokens(&tree, &expanded))
}
