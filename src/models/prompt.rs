use super::profile::EmotionalProfileRequest;

pub const SYSTEM_INSTRUCTION: &str = "You are a helpful mental wellness assistant.";

pub const TRIGGERS_CLAUSE: &str =
    "- Write how easily they can be emotionally triggered and what their emotional triggers might be.";
pub const OVERWHELM_CLAUSE: &str = "- Write how easily they get overwhelmed and anxious.";
pub const EXERCISES_CLAUSE: &str = "- Suggest 3 exercises to improve emotional resilience.";
pub const ACTIVITIES_CLAUSE: &str =
    "- Suggest 2 types of games or activities that would suit their personality.";
pub const PRODUCT_CLAUSE: &str = "- Suggest how NrveNest can help them.";

/// Renders the questionnaire into the user turn sent to the model.
pub fn build_prompt(req: &EmotionalProfileRequest) -> String {
    format!(
        "A user has filled out the following emotional profile form:\n\
         - Age: {age}\n\
         - Personality Traits: {personality}\n\
         - Hobbies: {hobbies}\n\
         - Music Preferences: {music}\n\
         - Emotional Needs: {needs}\n\
         - Common Moods: {moods}\n\
         - Learning Style: {style}\n\
         \n\
         Based on this information:\n\
         {TRIGGERS_CLAUSE}\n\
         {OVERWHELM_CLAUSE}\n\
         {EXERCISES_CLAUSE}\n\
         {ACTIVITIES_CLAUSE}\n\
         {PRODUCT_CLAUSE}\n\
         \n\
         Return the result as a thoughtful paragraph.",
        age = req.age,
        personality = req.personality,
        hobbies = req.hobbies,
        music = req.music,
        needs = req.emotional_needs,
        moods = req.moods,
        style = req.learning_style,
    )
}
