//! Graphviz rendering of a machine's state graph.

use crate::engine::StateMachine;
use std::fmt::Write;

/// Emit the machine as a DOT digraph.
///
/// Nodes are sorted by name; edges follow registration order. The current
/// state is drawn bold, and guarded transitions dashed. Transitions to
/// states that are not registered still produce an edge, so dangling wiring
/// is visible in the picture.
///
/// # Example
///
/// ```rust
/// use waypoint::core::State;
/// use waypoint::engine::{StateMachine, Transition};
/// use waypoint::render::to_dot;
///
/// let mut machine = StateMachine::with_initial("demo", State::new("A"));
/// machine.add_state(State::new("B")).unwrap();
/// machine.add_transition(Transition::new("A", "B"));
///
/// let dot = to_dot(&machine);
/// assert!(dot.starts_with("digraph \"demo\" {"));
/// assert!(dot.contains("\"A\" -> \"B\";"));
/// ```
pub fn to_dot(machine: &StateMachine) -> String {
    let mut out = String::new();
    let current = machine.current_name();

    let _ = writeln!(out, "digraph {} {{", quote(machine.name()));
    for name in machine.state_names() {
        if Some(name) == current {
            let _ = writeln!(out, "    {} [style=bold];", quote(name));
        } else {
            let _ = writeln!(out, "    {};", quote(name));
        }
    }
    for transition in machine.transitions().iter() {
        let style = if transition.guard().is_some() {
            " [style=dashed]"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "    {} -> {}{};",
            quote(transition.from_state()),
            quote(transition.to_state()),
            style
        );
    }
    out.push_str("}\n");
    out
}

fn quote(id: &str) -> String {
    format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;
    use crate::engine::Transition;

    #[test]
    fn renders_nodes_and_edges() {
        let mut machine = StateMachine::with_initial("support", State::new("Welcome"));
        machine.add_state(State::new("MainMenu")).unwrap();
        machine.add_state(State::new("Goodbye")).unwrap();
        machine.add_transition(Transition::new("Welcome", "MainMenu"));
        machine.add_transition(Transition::new("MainMenu", "Goodbye").when(|i, _| i == "exit"));

        let dot = to_dot(&machine);

        let expected = "digraph \"support\" {\n\
                        \x20   \"Goodbye\";\n\
                        \x20   \"MainMenu\";\n\
                        \x20   \"Welcome\" [style=bold];\n\
                        \x20   \"Welcome\" -> \"MainMenu\";\n\
                        \x20   \"MainMenu\" -> \"Goodbye\" [style=dashed];\n\
                        }\n";
        assert_eq!(dot, expected);
    }

    #[test]
    fn quotes_are_escaped() {
        let machine = StateMachine::with_initial("say \"hi\"", State::new("A"));

        assert!(to_dot(&machine).starts_with("digraph \"say \\\"hi\\\"\" {"));
    }
}
