//! Show derived diagnosis hierarchies without touching the store.

use neograph_core::code_chain;
use neograph_core::model::strip_code;

use crate::output;

pub fn execute(codes: &[String]) {
    for raw in codes {
        let code = strip_code(raw);
        output::print_chain(raw, &code_chain(&code));
    }
}
