//! Structured fuzz target for predicate SQL rendering.
//!
//! Builds arbitrary predicate trees and checks that every bound value has a
//! placeholder.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_predicate_sql
//! ```

#![no_main]

use arbitrary::Arbitrary;
use criters_query::{Combine, FieldRef, FilterValue, Predicate, Restriction};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Null,
    Int(i64),
    Text(String),
    List(Vec<i64>),
}

#[derive(Debug, Arbitrary)]
enum FuzzPredicate {
    Leaf {
        column: String,
        restriction: u8,
        value: FuzzValue,
    },
    Group {
        or: bool,
        children: Vec<FuzzPredicate>,
    },
}

impl FuzzPredicate {
    fn build(self, depth: usize) -> Predicate {
        match self {
            Self::Group { or, children } if depth < 8 => {
                let op = if or { Combine::Or } else { Combine::And };
                let children = children.into_iter().map(|c| c.build(depth + 1)).collect();
                Predicate::group(op, children)
            }
            Self::Group { .. } => leaf("id".to_string(), 0, FuzzValue::Null),
            Self::Leaf {
                column,
                restriction,
                value,
            } => leaf(column, restriction, value),
        }
    }
}

fn leaf(column: String, restriction: u8, value: FuzzValue) -> Predicate {
    let restriction = Restriction::ALL[restriction as usize % Restriction::ALL.len()];
    let value = match value {
        FuzzValue::Null => FilterValue::Null,
        FuzzValue::Int(i) => FilterValue::Int(i),
        FuzzValue::Text(s) => FilterValue::String(s),
        FuzzValue::List(items) => FilterValue::from(items),
    };
    let field = FieldRef {
        model: "Fuzz".into(),
        field: column.as_str().into(),
        column: column.as_str().into(),
        qualifier: "fuzz".into(),
    };
    Predicate::leaf(field, restriction, value)
}

fuzz_target!(|input: FuzzPredicate| {
    let predicate = input.build(0);
    let (sql, params) = predicate.to_sql(3);
    for n in 1..=params.len() {
        assert!(sql.contains(&format!("${}", n + 3)), "missing placeholder in {sql}");
    }
});
