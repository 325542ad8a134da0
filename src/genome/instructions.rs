//! Five-step instruction template filled from a recipe's gene groups.

use crate::schema::{BaseCategory, FlavorCategory};

use super::{BakeParameters, BaseComposition, FlavorComposition};

/// Render the preheat / dry-mix / cream / combine / bake steps.
///
/// Optional clauses (dry and spice lists, wet ingredients, the mix-in
/// fold-in and the rest step) are omitted when empty or zero.
pub fn render_instructions(
    base: &BaseComposition,
    flavor: &FlavorComposition,
    bake: &BakeParameters,
) -> String {
    let mut dry = base.names(BaseCategory::Flour);
    if dry.is_empty() {
        dry.push("flour");
    }
    dry.extend(base.names(BaseCategory::Dry));
    dry.extend(flavor.names(FlavorCategory::Spice));

    let mut creamed = base.names(BaseCategory::Sugar);
    creamed.extend(base.names(BaseCategory::Fat));
    creamed.extend(flavor.names(FlavorCategory::Oil));
    creamed.extend(base.names(BaseCategory::Wet));

    let mut text = format!(
        "Step 1: Preheat the oven to {} degrees F.\n",
        bake.temperature
    );

    text.push_str(&format!(
        "Step 2: Mix together dry ingredients, combining the following in a large bowl: {}.",
        dry.join(", ")
    ));
    if !creamed.is_empty() {
        text.push_str(&format!(
            " In another bowl, cream together the following: {}.",
            creamed.join(", ")
        ));
    }
    text.push('\n');

    text.push_str("Step 3: Gradually add the dry ingredients to the wet ingredients, mixing well");
    let mix_ins = flavor.names(FlavorCategory::MixIn);
    if !mix_ins.is_empty() {
        text.push_str(&format!(". Once mixed, add the {}", mix_ins.join(", ")));
    }
    text.push_str(".\n");

    text.push_str("Step 4: ");
    if bake.rest_hours > 0 {
        text.push_str(&format!(
            "Let the mixture rest for {} hours in the refrigerator. ",
            bake.rest_hours
        ));
    }
    text.push_str(&format!(
        "On a baking sheet lined with parchment paper, add {} grams of dough, rolled into a \
         sphere. Bake for {} minutes, turning the sheet around halfway through the baking time.\n",
        bake.dough_grams, bake.bake_minutes
    ));

    text.push_str("Step 5: Let the cookies cool.");
    text
}
