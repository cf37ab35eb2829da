pub mod ast {
    macro_rules! or {
        ($left:expr, $right:expr) => {
            $crate::ast::Node::Operator(
                $crate::ast::Connective::Or,
                Box::new($left),
                Box::new($right),
            )
        };
    }

    macro_rules! and {
        ($left:expr, $right:expr) => {
            $crate::ast::Node::Operator(
                $crate::ast::Connective::And,
                Box::new($left),
                Box::new($right),
            )
        };
    }

    macro_rules! operand {
        ($expression:expr) => {
            $crate::ast::Node::Operand($expression.to_string())
        };
    }

    pub(crate) use and;
    pub(crate) use operand;
    pub(crate) use or;
}

pub mod records {
    use crate::record::{Record, Value};

    /// The record used across the evaluation tests.
    pub fn an_employee(age: i64, department: &str) -> Record {
        [
            ("age", Value::Integer(age)),
            ("department", Value::from(department)),
        ]
        .into_iter()
        .collect()
    }
}

pub mod strategies {
    use crate::ast::{Connective, Node};
    use proptest::prelude::*;

    pub fn comparison() -> impl Strategy<Value = String> {
        let operator = prop_oneof![
            Just("<"),
            Just("<="),
            Just(">"),
            Just(">="),
            Just("=="),
            Just("!=")
        ];
        let literal = prop_oneof![
            any::<i64>().prop_map(|value| value.to_string()),
            "[a-zA-Z]{0,8}".prop_map(|value| format!("'{value}'")),
            any::<bool>().prop_map(|value| value.to_string()),
        ];
        ("[a-z_][a-z0-9_]{0,7}", operator, literal)
            .prop_filter("boolean keywords are not attributes", |(name, _, _)| {
                !matches!(name.as_str(), "true" | "false")
            })
            .prop_map(|(name, operator, literal)| format!("{name} {operator} {literal}"))
    }

    pub fn connective() -> impl Strategy<Value = Connective> {
        prop_oneof![Just(Connective::And), Just(Connective::Or)]
    }

    pub fn node() -> impl Strategy<Value = Node> {
        let leaf = comparison().prop_map(Node::Operand);
        leaf.prop_recursive(6, 64, 2, |inner| {
            (connective(), inner.clone(), inner)
                .prop_map(|(connective, left, right)| Node::operator(connective, left, right))
        })
    }
}
