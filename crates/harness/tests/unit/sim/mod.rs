//! Simulation driver unit tests.
