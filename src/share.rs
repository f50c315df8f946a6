use std::fmt::Display;
use std::future::Future;
use std::path::Path;

use crate::quiz::Category;

/// Ways of handing the result card to the player, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareMethod {
    /// The house picture with the share text as caption
    Photo,
    /// Share text plus a link to the bot
    TextWithLink,
    PlainText,
}

pub const FALLBACK_CHAIN: [ShareMethod; 3] = [
    ShareMethod::Photo,
    ShareMethod::TextWithLink,
    ShareMethod::PlainText,
];

/// The part of `FALLBACK_CHAIN` that can work for `category`: the photo step
/// needs the house image on disk and the link step needs a share URL.
pub fn available_methods(category: &Category, share_url: Option<&str>) -> Vec<ShareMethod> {
    FALLBACK_CHAIN
        .iter()
        .copied()
        .filter(|method| match method {
            ShareMethod::Photo => Path::new(&category.image).exists(),
            ShareMethod::TextWithLink => share_url.is_some(),
            ShareMethod::PlainText => true,
        })
        .collect()
}

pub const SHARE_FAILED_NOTICE: &str =
    "Не получилось подготовить картинку. Попробуй ещё раз.";

pub fn share_text(category: &Category) -> String {
    format!(
        "Распределяющая Шляпа определила меня в {}! {}",
        category.name, category.emoji
    )
}

pub fn share_text_with_link(category: &Category, url: &str) -> String {
    format!("{}\n{}", share_text(category), url)
}

/// Tries each method in order until one succeeds. Returns the method that
/// worked, or `None` when the whole chain failed.
pub async fn share_with_fallback<F, Fut, E>(chain: &[ShareMethod], mut attempt: F) -> Option<ShareMethod>
where
    F: FnMut(ShareMethod) -> Fut,
    Fut: Future<Output = Result<(), E>>,
    E: Display,
{
    for &method in chain {
        match attempt(method).await {
            Ok(()) => {
                log::debug!("Result shared via {:?}", method);
                return Some(method);
            }
            Err(err) => log::warn!("Sharing via {:?} failed: {}", method, err),
        }
    }

    log::warn!("All share methods failed");
    None
}
