//! Form Scenario Test Suite
//!
//! End-to-end scenarios over the public `formstore` API, driven by a
//! sample personal-details form (name, email, age, gender, address and a
//! list of hobbies).
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test form_scenarios
//! ```

// Test modules
mod test_utils;

mod arrays;
mod bindings;
mod concurrency;
mod submit;
