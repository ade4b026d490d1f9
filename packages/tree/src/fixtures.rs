//! Shared catalog and geometry for unit tests.
//!
//! Sizes in tests are computed from these numbers: 5px per character,
//! 10px text lines, 4/2 inner padding, 2/2 element padding.

use codeblocks_format::Catalog;
use serde_json::json;

use crate::geometry::{Geometry, LayoutConfig, MonospaceMetrics};

pub(crate) fn geometry() -> Geometry {
    Geometry::new(
        LayoutConfig {
            inner_padding_horizontal: 4.0,
            inner_padding_vertical: 2.0,
            element_padding_horizontal: 2.0,
            element_padding_vertical: 2.0,
            empty_field_width: 20.0,
            empty_field_height: 10.0,
            empty_line_width: 10.0,
            end_line_width: 30.0,
            scale: 1.0,
        },
        MonospaceMetrics {
            char_width: 5.0,
            line_height: 10.0,
        },
    )
}

pub(crate) fn catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog
        .register(json!([
            {"id": "print", "category": 0,
             "lines": [[{"type": "text", "value": "print"}, {"type": "code", "value": "TEXT_IN"}]]},
            {"id": "add", "category": 1, "returns": "NUM",
             "lines": [[{"type": "code", "value": "NUM_IN"}, {"type": "text", "value": "+"}, {"type": "code", "value": "NUM_IN"}]]},
            {"id": "pi", "category": 1, "returns": "NUM",
             "lines": [[{"type": "text", "value": "pi"}]]},
            {"id": "yes", "category": 1, "returns": "BOOL",
             "lines": [[{"type": "text", "value": "yes"}]]},
            {"id": "var", "category": 2, "takes": "NUM", "returns": "NUM",
             "lines": [[{"type": "text", "value": "x"}]]},
            {"id": "set", "category": 2,
             "lines": [[{"type": "text", "value": "set"}, {"type": "code", "value": "NUM_OUT"},
                        {"type": "text", "value": "="}, {"type": "code", "value": "NUM_IN"}]]},
            {"id": "repeat", "category": 0,
             "lines": [[{"type": "text", "value": "repeat"}, {"type": "code", "value": "NUM_IN"}], []]},
            {"id": "if_else", "category": 0,
             "lines": [[{"type": "text", "value": "if"}, {"type": "code", "value": "BOOL_IN"}], [],
                       [{"type": "text", "value": "else"}], []]},
            {"id": "fork", "category": 0,
             "lines": [[], [{"type": "text", "value": "or"}], []]}
        ]))
        .expect("fixture catalog is valid");
    catalog
}
