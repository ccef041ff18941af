//! Client-string heuristics: browser family, device class, bot flag.
//!
//! Each check lowercases the string and walks an ordered rule table; the first
//! matching needle wins. The three checks are independent of each other.

use crate::error::AnalyzerError;
use crate::types::ClientBreakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserCategory {
  Chrome,
  Firefox,
  Bing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceCategory {
  Mobile,
  Desktop,
}

const BROWSER_RULES: &[(&str, BrowserCategory)] = &[
  ("chrome", BrowserCategory::Chrome),
  ("firefox", BrowserCategory::Firefox),
  ("bing", BrowserCategory::Bing),
];

const DEVICE_RULES: &[(&str, DeviceCategory)] = &[
  ("android", DeviceCategory::Mobile),
  ("iphone", DeviceCategory::Mobile),
  ("mobile", DeviceCategory::Mobile),
  ("windows", DeviceCategory::Desktop),
];

const BOT_NEEDLE: &str = "bot";

/// Classification of a single client string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientProfile {
  pub browser: Option<BrowserCategory>,
  pub device: Option<DeviceCategory>,
  pub is_bot: bool,
}

fn first_match<T: Copy>(haystack: &str, rules: &[(&str, T)]) -> Option<T> {
  rules
    .iter()
    .find(|(needle, _)| haystack.contains(needle))
    .map(|&(_, label)| label)
}

pub fn classify(client_id: &str) -> ClientProfile {
  let ua = client_id.to_lowercase();
  ClientProfile {
    browser: first_match(&ua, BROWSER_RULES),
    device: first_match(&ua, DEVICE_RULES),
    is_bot: ua.contains(BOT_NEEDLE),
  }
}

/// Count categories over a client-id column and derive percentages.
///
/// Percentages are `count * 100 / (bot + mobile + desktop)`, truncated.
pub fn aggregate<I, S>(client_ids: I) -> Result<ClientBreakdown, AnalyzerError>
where
  I: IntoIterator<Item = S>,
  S: AsRef<str>,
{
  let mut out = ClientBreakdown::default();
  let mut seen = 0usize;

  for client_id in client_ids {
    seen += 1;
    let profile = classify(client_id.as_ref());
    match profile.browser {
      Some(BrowserCategory::Chrome) => out.chrome += 1,
      Some(BrowserCategory::Firefox) => out.firefox += 1,
      Some(BrowserCategory::Bing) => out.bing += 1,
      None => {}
    }
    match profile.device {
      Some(DeviceCategory::Mobile) => out.mobile += 1,
      Some(DeviceCategory::Desktop) => out.desktop += 1,
      None => {}
    }
    if profile.is_bot {
      out.bot += 1;
    }
  }

  if seen == 0 {
    return Err(AnalyzerError::EmptyInput("no client strings to classify"));
  }

  let total = out.bot + out.mobile + out.desktop;
  if total == 0 {
    return Err(AnalyzerError::DivisionByZero(
      "no bot, mobile or desktop client strings",
    ));
  }

  out.mobile_pct = out.mobile * 100 / total;
  out.desktop_pct = out.desktop * 100 / total;
  out.bot_pct = out.bot * 100 / total;
  Ok(out)
}
