//! Raw syntax tree handed over by the upstream BAF parser.
//!
//! The grammar itself lives elsewhere; we only see its output: a generic
//! tree of kind-tagged nodes, each remembering the first and last token it
//! was built from so diagnostics can point back into the source.

use serde::{Deserialize, Serialize};

/// One source token. Positions are 1-based, as the parser reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub line: u32,
    #[serde(default)]
    pub column: u32,
}

impl Token {
    pub fn new(image: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            image: image.into(),
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum RawKind {
    /// `IF … THEN … END` blocks, one per child.
    Script,
    /// Bare list of triggers (dialogue conditions and the like).
    TriggerSequence,
    /// Bare list of actions (dialogue actions and the like).
    ActionSequence,
    ConditionResponse,
    Condition,
    ResponseSet,
    /// `RESPONSE #<prob>` followed by actions.
    Response,
    Trigger {
        name: String,
        #[serde(default)]
        negated: bool,
    },
    Action {
        name: String,
    },
    /// Wraps one actual argument of a trigger/action call.
    Parameter,
    Literal {
        text: String,
    },
    Point,
    Rect,
    Object,
    /// Object identifier; with children it is a composite like
    /// `LastSeenBy(Player1)`.
    Identifier {
        name: String,
    },
    /// `[EA.GENERAL.RACE…]` tuple.
    Target,
    /// `| <value>` tail of an integer argument.
    OrExpr,
}

impl RawKind {
    pub fn label(&self) -> &'static str {
        match self {
            RawKind::Script => "script",
            RawKind::TriggerSequence => "trigger sequence",
            RawKind::ActionSequence => "action sequence",
            RawKind::ConditionResponse => "condition-response block",
            RawKind::Condition => "condition",
            RawKind::ResponseSet => "response set",
            RawKind::Response => "response",
            RawKind::Trigger { .. } => "trigger",
            RawKind::Action { .. } => "action",
            RawKind::Parameter => "parameter",
            RawKind::Literal { .. } => "literal",
            RawKind::Point => "point",
            RawKind::Rect => "rectangle",
            RawKind::Object => "object",
            RawKind::Identifier { .. } => "object identifier",
            RawKind::Target => "object target",
            RawKind::OrExpr => "OR expression",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    #[serde(flatten)]
    pub kind: RawKind,
    #[serde(default)]
    pub first: Token,
    #[serde(default)]
    pub last: Token,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn new(kind: RawKind, children: Vec<RawNode>) -> Self {
        Self {
            kind,
            first: Token::default(),
            last: Token::default(),
            children,
        }
    }

    /// Attach source tokens, builder style.
    pub fn at(mut self, first: Token, last: Token) -> Self {
        self.first = first;
        self.last = last;
        self
    }

    pub fn literal(text: impl Into<String>) -> Self {
        Self::new(RawKind::Literal { text: text.into() }, Vec::new())
    }

    pub fn trigger(name: impl Into<String>, negated: bool, params: Vec<RawNode>) -> Self {
        Self::new(
            RawKind::Trigger {
                name: name.into(),
                negated,
            },
            params,
        )
    }

    pub fn action(name: impl Into<String>, params: Vec<RawNode>) -> Self {
        Self::new(RawKind::Action { name: name.into() }, params)
    }

    pub fn param(value: RawNode) -> Self {
        Self::new(RawKind::Parameter, vec![value])
    }

    pub fn identifier(name: impl Into<String>, args: Vec<RawNode>) -> Self {
        Self::new(RawKind::Identifier { name: name.into() }, args)
    }

    pub fn object(shape: RawNode) -> Self {
        Self::new(RawKind::Object, vec![shape])
    }

    /// Literal text of this node, if it is a literal.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            RawKind::Literal { text } => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_tagged_tree() {
        let json = r#"{
            "kind": "TriggerSequence",
            "first": { "image": "See", "line": 1, "column": 1 },
            "children": [
                { "kind": "Trigger", "name": "See", "negated": true,
                  "children": [
                    { "kind": "Parameter", "children": [
                        { "kind": "Object", "children": [
                            { "kind": "Identifier", "name": "Player1" }
                        ] }
                    ] }
                  ] }
            ]
        }"#;
        let node: RawNode = serde_json::from_str(json).unwrap();

        assert_eq!(node.kind, RawKind::TriggerSequence);
        assert_eq!(node.first, Token::new("See", 1, 1));
        assert_eq!(node.last, Token::default());

        let expected = RawNode::trigger(
            "See",
            true,
            vec![RawNode::param(RawNode::object(RawNode::identifier(
                "Player1",
                vec![],
            )))],
        );
        assert_eq!(node.children, vec![expected]);
    }
}
