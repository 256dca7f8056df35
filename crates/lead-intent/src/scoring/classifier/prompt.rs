use crate::scoring::domain::{LeadProfile, Offer};

pub(crate) const SYSTEM_INSTRUCTION: &str =
    "You are a B2B sales analyst. Answer with exactly one word: High, Medium, or Low.";

/// Render the classification request for one lead against the active offer.
pub(crate) fn build_prompt(lead: &LeadProfile, offer: &Offer) -> String {
    format!(
        "Classify the buying intent of this prospect for the product below.\n\
         \n\
         Product: {offer_name}\n\
         Value propositions: {value_props}\n\
         Ideal use cases: {use_cases}\n\
         \n\
         Prospect:\n\
         - Name: {name}\n\
         - Role: {role}\n\
         - Company: {company}\n\
         - Industry: {industry}\n\
         - Location: {location}\n\
         - LinkedIn bio: {bio}\n\
         \n\
         Respond with exactly one word: High, Medium, or Low.",
        offer_name = offer.name,
        value_props = join_or_none(&offer.value_props),
        use_cases = join_or_none(&offer.ideal_use_cases),
        name = or_unknown(&lead.name),
        role = or_unknown(&lead.role),
        company = or_unknown(&lead.company),
        industry = or_unknown(&lead.industry),
        location = or_unknown(&lead.location),
        bio = or_unknown(&lead.linkedin_bio),
    )
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none listed".to_string()
    } else {
        items.join(", ")
    }
}

fn or_unknown(value: &str) -> &str {
    if value.trim().is_empty() {
        "unknown"
    } else {
        value
    }
}
