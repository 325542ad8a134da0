//! Recipe genome: ingredients, the three gene groups and the recipe that
//! owns them.
//!
//! - **Ingredient** (`ingredient`): parsed line items and their rendering
//! - **Base** (`base`): flour/sugar/fat/wet/dry amounts with ratio operators
//! - **Flavor** (`flavor`): spices, mix-ins and oils with add/delete/swap
//! - **Bake** (`bake`): temperature, timings and dough size
//! - **Recipe** (`recipe`): the individual evolved by the engine

mod bake;
mod base;
mod flavor;
mod ingredient;
mod instructions;
mod recipe;

pub use bake::*;
pub use base::*;
pub use flavor::*;
pub use ingredient::*;
pub use instructions::render_instructions;
pub use recipe::*;
