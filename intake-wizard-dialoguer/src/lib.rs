//! # intake-wizard-dialoguer
//!
//! Dialoguer wizard front end for intake.
//!
//! This crate provides a command-line wizard for filling in an intake using
//! the `dialoguer` library. Personal details come first, then one question
//! per screen, with a "Back" entry on every choice list.
//!
//! ## Example
//!
//! ```rust,ignore
//! use intake::{Intake, IntakeFrontend, wealth};
//! use intake_wizard_dialoguer::DialoguerWizard;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut intake = Intake::new(wealth::wealth_catalog()?);
//!     DialoguerWizard::new().fill(&mut intake)?;
//!     println!("Answered {} questions", intake.store().len());
//!     Ok(())
//! }
//! ```

mod backend;

pub use backend::{DialoguerWizard, WizardError};
