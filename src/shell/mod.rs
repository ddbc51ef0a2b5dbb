// Composition root for the event notifications dispatcher.
//
// Responsibilities
// - Read config from environment.
// - Instantiate concrete infrastructure implementations.
// - Spawn the dispatcher and the consumer that feeds it demand.

pub mod config;
