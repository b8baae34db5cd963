use crate::syntax::LeafToken;
use crate::types::{DuplicateRun, DuplicationReport};

// Token kinds that close a statement-boundary group inside a matched run.
const STATEMENT_BOUNDARIES: [&str; 3] = ["}", ")", ";"];

// Acceptance floors: a run must be at least this many tokens long, and at
// least a fifth of the shorter stream, before it is reported.
const MIN_RUN_TOKENS: usize = 30;
const RELATIVE_DIVISOR: usize = 5;

fn accepted(count: usize, shorter_stream_len: usize) -> bool {
    count >= MIN_RUN_TOKENS && count * RELATIVE_DIVISOR >= shorter_stream_len
}

/// Greedy two-stream alignment over raw leaf tokens. Matching is by token
/// type only, so renamed identifiers still align; the report quotes each
/// side's literal text. The stream-2 cursor never retreats within a scan,
/// and the aligner does not backtrack to earlier alignments.
pub(crate) fn align(stream_a: &[LeafToken], stream_b: &[LeafToken]) -> DuplicationReport {
    let shorter = stream_a.len().min(stream_b.len());
    let mut runs = Vec::new();
    let mut number = 1;
    let mut i = 0;
    let mut pos = 0;

    while i < stream_a.len() {
        let mut count = 0;
        let mut left_groups: Vec<String> = Vec::new();
        let mut right_groups: Vec<String> = Vec::new();
        let mut left_pending: Vec<&str> = Vec::new();
        let mut right_pending: Vec<&str> = Vec::new();

        let mut j = pos;
        while j < stream_b.len() {
            if i + count >= stream_a.len() {
                pos = stream_b.len();
                break;
            }
            if stream_a[i + count].kind == stream_b[j].kind {
                left_pending.push(&stream_a[i + count].text);
                right_pending.push(&stream_b[j].text);
                if STATEMENT_BOUNDARIES.contains(&stream_a[i + count].kind) {
                    left_groups.push(left_pending.join(" "));
                    right_groups.push(right_pending.join(" "));
                    left_pending.clear();
                    right_pending.clear();
                }
                count += 1;
                j += 1;
                if j == stream_b.len() {
                    pos = j;
                }
                continue;
            }
            if count > 0 {
                // Next scan resumes here; matches never retreat in stream 2.
                pos = j;
                break;
            }
            j += 1;
            if j == stream_b.len() {
                pos = j;
            }
        }

        if accepted(count, shorter) {
            // A tail that never reached a boundary token counts toward the
            // run length but is not quoted.
            runs.push(DuplicateRun {
                number,
                left: left_groups,
                right: right_groups,
            });
            number += 1;
            i += count;
        } else {
            i += 1;
            pos = 0;
        }
    }

    DuplicationReport { runs }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> LeafToken {
        LeafToken {
            kind: "identifier",
            text: name.to_string(),
        }
    }

    fn punct(kind: &'static str) -> LeafToken {
        LeafToken {
            kind,
            text: kind.to_string(),
        }
    }

    // n tokens ending in a semicolon every 3rd position.
    fn stream(n: usize, prefix: &str) -> Vec<LeafToken> {
        (0..n)
            .map(|idx| {
                if idx % 3 == 2 {
                    punct(";")
                } else {
                    ident(&format!("{prefix}{idx}"))
                }
            })
            .collect()
    }

    #[test]
    fn identical_streams_round_trip_as_one_run() {
        let a = stream(60, "x");
        let b = stream(60, "x");
        let report = align(&a, &b);

        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.render_a(), report.render_b());

        // The single run covers the whole stream: every token appears in a
        // boundary-closed group because the stream ends on a semicolon.
        let quoted: usize = report.runs[0]
            .left
            .iter()
            .map(|group| group.split(' ').count())
            .sum();
        assert_eq!(quoted, 60);
    }

    #[test]
    fn renamed_identifiers_still_align_by_type() {
        let a = stream(45, "a");
        let b = stream(45, "b");
        let report = align(&a, &b);

        assert_eq!(report.runs.len(), 1);
        assert!(report.runs[0].left[0].contains("a0"));
        assert!(report.runs[0].right[0].contains("b0"));
    }

    #[test]
    fn twenty_nine_token_run_fails_the_absolute_floor() {
        // Both streams are longer than 145 tokens so the relative floor would
        // pass; the absolute floor must still reject a 29-token run.
        let mut a = stream(29, "x");
        a.extend((0..121).map(|idx| LeafToken {
            kind: "number_literal",
            text: format!("{idx}"),
        }));
        let mut b = stream(29, "x");
        b.extend((0..121).map(|_| punct("}")));

        assert!(a.len() > 145 && b.len() > 145);
        let report = align(&a, &b);
        assert!(report.runs.is_empty());
    }

    #[test]
    fn thirty_token_run_in_hundred_token_streams_is_reported() {
        // 30 >= 100 / 5, so both floors pass.
        let mut a = stream(30, "x");
        a.extend((0..70).map(|idx| LeafToken {
            kind: "number_literal",
            text: format!("{idx}"),
        }));
        let mut b = stream(30, "x");
        b.extend((0..70).map(|_| punct("}")));

        assert_eq!(a.len(), 100);
        assert_eq!(b.len(), 100);
        let report = align(&a, &b);
        assert_eq!(report.runs.len(), 1);
    }

    #[test]
    fn short_common_boilerplate_is_filtered_by_the_relative_floor() {
        // A 30-token match inside two 200-token streams fails 30 >= 200/5.
        let mut a = stream(30, "x");
        a.extend((0..170).map(|idx| LeafToken {
            kind: "number_literal",
            text: format!("{idx}"),
        }));
        let mut b = stream(30, "x");
        b.extend((0..170).map(|_| punct("}")));

        let report = align(&a, &b);
        assert!(report.runs.is_empty());
    }

    #[test]
    fn groups_split_at_statement_boundaries() {
        let a = stream(33, "x");
        let b = stream(33, "x");
        let report = align(&a, &b);

        assert_eq!(report.runs.len(), 1);
        assert_eq!(report.runs[0].left.len(), 11);
        assert!(report.runs[0].left.iter().all(|group| group.ends_with(';')));
    }

    #[test]
    fn unclosed_tail_counts_toward_length_but_is_not_quoted() {
        // 31 tokens, last boundary at index 29: the trailing identifier keeps
        // the run at length 31 but stays out of the quoted groups.
        let a = stream(31, "x");
        let b = stream(31, "x");
        let report = align(&a, &b);

        assert_eq!(report.runs.len(), 1);
        let quoted: usize = report.runs[0]
            .left
            .iter()
            .map(|group| group.split(' ').count())
            .sum();
        assert_eq!(quoted, 30);
    }

    #[test]
    fn disjoint_streams_report_nothing() {
        let a: Vec<LeafToken> = (0..50).map(|_| ident("x")).collect();
        let b: Vec<LeafToken> = (0..50).map(|_| punct(";")).collect();
        assert!(align(&a, &b).runs.is_empty());
    }

    #[test]
    fn empty_streams_report_nothing() {
        assert!(align(&[], &[]).runs.is_empty());
        assert!(align(&stream(40, "x"), &[]).runs.is_empty());
    }

    #[test]
    fn run_numbers_increment_per_accepted_run() {
        // Two separate 36-token matches split by a long disjoint middle
        // section in stream 1.
        let mut a = stream(36, "x");
        a.extend((0..12).map(|idx| LeafToken {
            kind: "number_literal",
            text: format!("{idx}"),
        }));
        a.extend(stream(36, "y"));

        let mut b = stream(36, "x");
        b.extend((0..12).map(|_| punct("}")));
        b.extend(stream(36, "y"));

        let report = align(&a, &b);
        assert_eq!(report.runs.len(), 2);
        assert_eq!(report.runs[0].number, 1);
        assert_eq!(report.runs[1].number, 2);
    }
}
