//! Customer Support Agent
//!
//! This example walks a support conversation through a state machine.
//!
//! Key concepts:
//! - Keyword guards route free-text messages to topics
//! - An oracle fallback handles messages no guard recognises
//! - Rollback undoes a wrong turn
//! - Checkpoints persist the conversation between sessions
//!
//! Run with: cargo run --example customer_support

use waypoint::builder::StateMachineBuilder;
use waypoint::core::{ContainsAny, MachineSnapshot, OneOf, State, StateContent};
use waypoint::engine::{StateMachine, Transition};
use waypoint::oracle::{DecisionPrompt, OracleError, OracleFallback, Suggestion};
use waypoint::render::to_dot;
use waypoint::store::{InMemoryStore, MachineStore};

/// Stand-in for a language model: picks returns for anything about damage.
fn keyword_oracle(prompt: &DecisionPrompt) -> Result<Suggestion, OracleError> {
    let text = prompt.stimulus.to_lowercase();
    if text.contains("broken") || text.contains("damaged") {
        Ok(Suggestion::Text(
            r#"{"next_state": "ReturnsAndRefunds"}"#.to_string(),
        ))
    } else {
        Ok(Suggestion::Abstain)
    }
}

fn build_agent() -> StateMachine {
    let topics = ["OrderTracking", "ReturnsAndRefunds", "ProductInquiry"];

    let mut builder = StateMachineBuilder::new()
        .name("customer-support")
        .states(
            [
                "Welcome",
                "MainMenu",
                "OrderTracking",
                "ReturnsAndRefunds",
                "ProductInquiry",
                "Goodbye",
            ]
            .into_iter()
            .map(State::new),
        )
        .transition(Transition::new("Welcome", "MainMenu"))
        .transition(
            Transition::new("MainMenu", "OrderTracking")
                .guarded_by(ContainsAny::new(["track", "where is my order"]))
                .then(|_: &MachineSnapshot<'_>, content: &mut StateContent| {
                    content.update_data("last_topic", "orders");
                    Ok(())
                }),
        )
        .transition(
            Transition::new("MainMenu", "ReturnsAndRefunds")
                .guarded_by(ContainsAny::new(["return", "refund"])),
        )
        .transition(
            Transition::new("MainMenu", "ProductInquiry")
                .guarded_by(ContainsAny::new(["product", "price", "stock"])),
        )
        .transition(
            Transition::new("MainMenu", "Goodbye").guarded_by(OneOf::new(["bye", "exit", "quit"])),
        );

    for topic in topics {
        builder = builder
            .transition(Transition::new(topic, "MainMenu").guarded_by(OneOf::new(["menu", "back"])))
            .transition(Transition::new(topic, "Goodbye").guarded_by(OneOf::new(["bye", "exit"])));
    }

    builder
        .fallback(OracleFallback::new(keyword_oracle))
        .build()
        .unwrap()
}

fn main() {
    println!("=== Customer Support Example ===\n");

    let mut agent = build_agent();
    println!("Agent '{}' starts in {:?}\n", agent.name(), agent.current_name());

    let messages = [
        "Hello!",
        "Where is my order?",
        "back",
        "My kettle arrived broken",
        "menu",
        "what's the weather?",
    ];

    for message in messages {
        match agent.trigger_transition(message) {
            Ok(outcome) if outcome.is_moved() => {
                println!("{message:>28}  ->  {:?}", outcome.target().unwrap_or_default());
            }
            Ok(outcome) => println!("{message:>28}  ->  stayed ({outcome:?})"),
            Err(err) => println!("{message:>28}  ->  error: {err}"),
        }
    }

    println!("\nHistory: {}", agent.history().names().join(" -> "));

    // Undo the last move
    let previous = agent.move_to_previous_state().unwrap();
    println!("Rolled back to: {}", previous.name());

    // Persist and resume
    let store = InMemoryStore::new();
    store.save(&agent.checkpoint().unwrap()).unwrap();
    let saved = store.load(agent.name()).unwrap().unwrap();
    let resumed = StateMachine::restore(saved).unwrap();
    println!(
        "Resumed '{}' in {:?} with {} history entries",
        resumed.name(),
        resumed.current_name(),
        resumed.history().len()
    );

    println!("\nGraphviz:\n{}", to_dot(&agent));

    println!("=== Example Complete ===");
}
