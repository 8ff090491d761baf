//! Translation of [`Filter`] trees into the wire filter grammar.
//!
//! Every filter kind maps to exactly one [`WireFilter`] shape, and the whole
//! mapping lives in [`compile`] so the grammar surface can be read in one
//! place. Compilation is pure: the same tree always yields the same output.

use crate::{
    error::CompileError,
    filter::{Condition, Filter},
    wire::{WireChain, WireCondition, WireFilter, WireInterleave},
};

pub fn compile(filter: &Filter) -> Result<WireFilter, CompileError> {
    compile_node(filter, "filter")
}

fn compile_node(filter: &Filter, path: &str) -> Result<WireFilter, CompileError> {
    filter
        .validate_node()
        .map_err(|source| CompileError::MalformedFilter {
            path: path.to_string(),
            source,
        })?;

    let wire = match filter {
        Filter::RowKeyRegex(pattern) => WireFilter::RowKeyRegexFilter(pattern.clone()),
        Filter::FamilyRegex(pattern) => WireFilter::FamilyNameRegexFilter(pattern.clone()),
        Filter::QualifierRegex(pattern) => {
            WireFilter::ColumnQualifierRegexFilter(pattern.clone())
        }
        Filter::ValueRegex(pattern) => WireFilter::ValueRegexFilter(pattern.clone()),
        Filter::ValueRange(range) => WireFilter::ValueRangeFilter(range.to_wire()),
        Filter::TimestampRange(range) => WireFilter::TimestampRangeFilter(range.to_wire()),
        Filter::ColumnRange(range) => WireFilter::ColumnRangeFilter(range.to_wire()),
        // Counts were range checked by validate_node.
        Filter::CellsPerRowOffset(n) => WireFilter::CellsPerRowOffsetFilter(*n as i32),
        Filter::CellsPerRowLimit(n) => WireFilter::CellsPerRowLimitFilter(*n as i32),
        Filter::CellsPerColumnLimit(n) => WireFilter::CellsPerColumnLimitFilter(*n as i32),
        Filter::RowSample(p) => WireFilter::RowSampleFilter(*p),
        Filter::StripValue => WireFilter::StripValueTransformer(true),
        Filter::Sink => WireFilter::Sink(true),
        Filter::PassAll => WireFilter::PassAllFilter(true),
        Filter::BlockAll => WireFilter::BlockAllFilter(true),
        Filter::ApplyLabel(label) => WireFilter::ApplyLabelTransformer(label.clone()),
        Filter::Chain(filters) => WireFilter::Chain(WireChain {
            filters: compile_children(filters, path, "chain")?,
        }),
        Filter::Union(filters) => WireFilter::Interleave(WireInterleave {
            filters: compile_children(filters, path, "interleave")?,
        }),
        Filter::Condition(condition) => {
            WireFilter::Condition(Box::new(compile_condition(condition, path)?))
        }
    };
    Ok(wire)
}

fn compile_children(
    filters: &[Filter],
    path: &str,
    kind: &str,
) -> Result<Vec<WireFilter>, CompileError> {
    filters
        .iter()
        .enumerate()
        .map(|(i, child)| compile_node(child, &format!("{path}.{kind}[{i}]")))
        .collect()
}

fn compile_condition(condition: &Condition, path: &str) -> Result<WireCondition, CompileError> {
    let branch = |filter: &Option<Filter>, name: &str| {
        filter
            .as_ref()
            .map(|f| compile_node(f, &format!("{path}.condition.{name}")))
            .transpose()
    };

    Ok(WireCondition {
        predicate_filter: compile_node(
            &condition.predicate,
            &format!("{path}.condition.predicate_filter"),
        )?,
        true_filter: branch(&condition.true_filter, "true_filter")?,
        false_filter: branch(&condition.false_filter, "false_filter")?,
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::{
        error::ValidationError,
        filter::{ColumnRange, ValueRange},
        wire::{WireBound, WireColumnRange},
    };

    #[test]
    fn test_leaf_filters() {
        let cases = vec![
            (
                Filter::row_key_regex("k.*").unwrap(),
                WireFilter::RowKeyRegexFilter(Bytes::from_static(b"k.*")),
            ),
            (
                Filter::family_regex("cf").unwrap(),
                WireFilter::FamilyNameRegexFilter("cf".to_string()),
            ),
            (
                Filter::cells_per_row_offset(2).unwrap(),
                WireFilter::CellsPerRowOffsetFilter(2),
            ),
            (
                Filter::cells_per_column_limit(1).unwrap(),
                WireFilter::CellsPerColumnLimitFilter(1),
            ),
            (Filter::StripValue, WireFilter::StripValueTransformer(true)),
            (Filter::Sink, WireFilter::Sink(true)),
            (
                Filter::apply_label("hot").unwrap(),
                WireFilter::ApplyLabelTransformer("hot".to_string()),
            ),
        ];

        for (filter, expected) in cases {
            assert_eq!(compile(&filter).unwrap(), expected, "{filter:?}");
        }
    }

    #[test]
    fn test_compile_is_deterministic() {
        let filter = Filter::chain(vec![
            Filter::column_range(ColumnRange::family("cf").unwrap()),
            Filter::value_range(ValueRange::closed("a", "b").unwrap()),
            Filter::row_sample(0.5).unwrap(),
        ])
        .unwrap();

        assert_eq!(compile(&filter).unwrap(), compile(&filter).unwrap());
    }

    #[test]
    fn test_chain_and_union_preserve_order() {
        let children = vec![
            Filter::family_regex("a").unwrap(),
            Filter::cells_per_row_limit(3).unwrap(),
            Filter::StripValue,
        ];
        let expected = vec![
            WireFilter::FamilyNameRegexFilter("a".to_string()),
            WireFilter::CellsPerRowLimitFilter(3),
            WireFilter::StripValueTransformer(true),
        ];

        let chain = compile(&Filter::chain(children.clone()).unwrap()).unwrap();
        assert_eq!(
            chain,
            WireFilter::Chain(WireChain {
                filters: expected.clone()
            })
        );

        let union = compile(&Filter::union(children).unwrap()).unwrap();
        assert_eq!(
            union,
            WireFilter::Interleave(WireInterleave { filters: expected })
        );
    }

    #[test]
    fn test_condition_omitted_branches_differ_from_pass_all() {
        let predicate = Filter::qualifier_regex("q").unwrap();

        let omitted = compile(&Filter::condition(predicate.clone(), None, None)).unwrap();
        let explicit = compile(&Filter::condition(
            predicate,
            Some(Filter::PassAll),
            Some(Filter::PassAll),
        ))
        .unwrap();

        let WireFilter::Condition(omitted) = omitted else {
            panic!("expected condition");
        };
        assert_eq!(omitted.true_filter, None);
        assert_eq!(omitted.false_filter, None);

        let WireFilter::Condition(explicit) = explicit else {
            panic!("expected condition");
        };
        assert_eq!(explicit.true_filter, Some(WireFilter::PassAllFilter(true)));
        assert_eq!(explicit.false_filter, Some(WireFilter::PassAllFilter(true)));

        assert_ne!(omitted, explicit);
    }

    #[test]
    fn test_omitted_branch_absent_from_serialized_form() {
        let filter = Filter::condition(Filter::BlockAll, Some(Filter::StripValue), None);
        let json = serde_json::to_value(compile(&filter).unwrap()).unwrap();
        let condition = &json["condition"];
        assert!(condition.get("true_filter").is_some());
        assert!(condition.get("false_filter").is_none());
    }

    #[test]
    fn test_nested_tree() {
        let filter = Filter::condition(
            Filter::chain(vec![
                Filter::column_range(
                    ColumnRange::new("cf", Some(Bytes::from_static(b"a")), None, true, true)
                        .unwrap(),
                ),
                Filter::cells_per_row_limit(1).unwrap(),
            ])
            .unwrap(),
            Some(Filter::union(vec![Filter::Sink, Filter::StripValue]).unwrap()),
            None,
        );

        let expected = WireFilter::Condition(Box::new(WireCondition {
            predicate_filter: WireFilter::Chain(WireChain {
                filters: vec![
                    WireFilter::ColumnRangeFilter(WireColumnRange {
                        family_name: "cf".to_string(),
                        start_qualifier: Some(WireBound::Closed(Bytes::from_static(b"a"))),
                        end_qualifier: None,
                    }),
                    WireFilter::CellsPerRowLimitFilter(1),
                ],
            }),
            true_filter: Some(WireFilter::Interleave(WireInterleave {
                filters: vec![
                    WireFilter::Sink(true),
                    WireFilter::StripValueTransformer(true),
                ],
            })),
            false_filter: None,
        }));

        assert_eq!(compile(&filter).unwrap(), expected);
    }

    #[test]
    fn test_malformed_tree_is_rejected_with_path() {
        // Built without the validating constructors.
        let filter = Filter::Chain(vec![
            Filter::PassAll,
            Filter::condition(Filter::PassAll, Some(Filter::Union(vec![])), None),
        ]);

        let err = compile(&filter).unwrap_err();
        assert_eq!(
            err,
            CompileError::MalformedFilter {
                path: "filter.chain[1].condition.true_filter".to_string(),
                source: ValidationError::EmptyCombinator("Union"),
            }
        );
    }
}
