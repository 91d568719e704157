// Resume builder wizard.
// Implements: step catalog, draft model, controller state machine, step and
// preview rendering, and the HTTP event handlers that drive them.

pub mod controller;
pub mod draft;
pub mod handlers;
pub mod render;
pub mod steps;
