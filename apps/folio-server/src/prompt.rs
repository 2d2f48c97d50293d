//! Cover image prompt template

use crate::extract::first_words;

/// Number of front-page words embedded in the prompt
pub const PROMPT_WORDS: usize = 30;

/// Build the image-generation prompt for a front-page excerpt
///
/// The word counts in the template are instructions to the model about the
/// layout of the image. Nothing here checks the generated image against them.
pub fn build_prompt(text: &str) -> String {
    let summary = first_words(text, PROMPT_WORDS);

    format!(
        "Create a simple document:

Essential requirements:
- Light gradient background from white to very light blue
- Clean professional look with subtle geometric pattern
- Three clear text sections on top of background:
  1. Title (large black heading - first 5-7 words)
  2. Main text (dark gray content - 15-20 words)
  3. Bottom text (small gray text - 5-8 words)

{summary}
"
    )
}
