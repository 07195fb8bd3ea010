//! Origin policy for WebSocket upgrade requests.

use axum::http::HeaderValue;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OriginRejection {
    #[error("malformed Origin header")]
    Malformed,
    #[error("origin '{origin}' is not in the allowlist")]
    NotAllowed { origin: String },
}

/// Which browser origins may open a connection.
///
/// Requests without an `Origin` header (non-browser clients) are always let
/// through; the header is only a browser-side protection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OriginPolicy {
    #[default]
    Any,
    /// Exact origins or `*` patterns such as `https://*.example.com`
    AllowList(Vec<String>),
}

impl OriginPolicy {
    /// Build a policy from configured patterns. A bare `*` (or no pattern) allows any origin.
    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| normalize(p.as_ref()).to_string())
            .filter(|p| !p.is_empty())
            .collect();

        if patterns.is_empty() || patterns.iter().any(|p| p == "*") {
            Self::Any
        } else {
            Self::AllowList(patterns)
        }
    }

    pub fn check(&self, origin: Option<&HeaderValue>) -> Result<(), OriginRejection> {
        let Self::AllowList(patterns) = self else {
            return Ok(());
        };
        let Some(origin) = origin else {
            return Ok(());
        };
        let origin = origin.to_str().map_err(|_| OriginRejection::Malformed)?;
        let origin = normalize(origin);

        if patterns.iter().any(|p| glob_match(p, origin)) {
            Ok(())
        } else {
            Err(OriginRejection::NotAllowed {
                origin: origin.to_string(),
            })
        }
    }
}

fn normalize(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

/// Simple glob matching where `*` matches any sequence of characters.
fn glob_match(pattern: &str, value: &str) -> bool {
    let segments: Vec<&str> = pattern.split('*').collect();
    let [first, middle @ .., last] = segments.as_slice() else {
        // No wildcard
        return pattern.eq_ignore_ascii_case(value);
    };

    let value = value.to_ascii_lowercase();
    let Some(mut remaining) = value.strip_prefix(&first.to_ascii_lowercase()) else {
        return false;
    };
    for segment in middle {
        let segment = segment.to_ascii_lowercase();
        match remaining.find(&segment) {
            Some(pos) => remaining = &remaining[pos + segment.len()..],
            None => return false,
        }
    }
    remaining.ends_with(&last.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(value: &str) -> HeaderValue {
        HeaderValue::from_str(value).unwrap()
    }

    fn allows(policy: &OriginPolicy, origin: &str) -> bool {
        policy.check(Some(&header(origin))).is_ok()
    }

    #[test]
    fn test_any_policy_accepts_everything() {
        // テスト項目: 既定のポリシーは全ての Origin を許可する
        // given (前提条件):
        let policy = OriginPolicy::from_patterns(["*"]);

        // when (操作) / then (期待する結果):
        assert_eq!(policy, OriginPolicy::Any);
        assert!(allows(&policy, "https://evil.example"));
        assert!(policy.check(None).is_ok());
    }

    #[test]
    fn test_empty_patterns_mean_any() {
        // テスト項目: パターンが空の場合は全て許可
        // given (前提条件):
        let patterns: Vec<String> = vec![" ".to_string()];

        // when (操作):
        let policy = OriginPolicy::from_patterns(patterns);

        // then (期待する結果):
        assert_eq!(policy, OriginPolicy::Any);
    }

    #[test]
    fn test_allow_list_exact_match() {
        // テスト項目: 許可リストに一致する Origin のみ許可される（末尾のスラッシュと大文字小文字は無視）
        // given (前提条件):
        let policy = OriginPolicy::from_patterns(["http://localhost:3000/"]);

        // when (操作) / then (期待する結果):
        assert!(allows(&policy, "http://localhost:3000"));
        assert!(allows(&policy, "HTTP://LOCALHOST:3000"));
        assert_eq!(
            policy.check(Some(&header("http://localhost:4000"))),
            Err(OriginRejection::NotAllowed {
                origin: "http://localhost:4000".to_string(),
            })
        );
    }

    #[test]
    fn test_allow_list_wildcard() {
        // テスト項目: ワイルドカードを含むパターンで部分一致する
        // given (前提条件):
        let policy = OriginPolicy::from_patterns(["https://*.example.com"]);

        // when (操作) / then (期待する結果):
        assert!(allows(&policy, "https://watch.example.com"));
        assert!(allows(&policy, "https://a.b.example.com"));
        assert!(!allows(&policy, "http://watch.example.com"));
        assert!(!allows(&policy, "https://example.com.evil.io"));
    }

    #[test]
    fn test_allow_list_without_origin_header() {
        // テスト項目: Origin ヘッダの無いリクエスト（ブラウザ以外）は許可される
        // given (前提条件):
        let policy = OriginPolicy::from_patterns(["https://watch.example.com"]);

        // when (操作):
        let result = policy.check(None);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_allow_list_rejects_non_utf8_origin() {
        // テスト項目: 不正なバイト列の Origin は拒否される
        // given (前提条件):
        let policy = OriginPolicy::from_patterns(["https://watch.example.com"]);
        let value = HeaderValue::from_bytes(b"https://\xffwatch").unwrap();

        // when (操作):
        let result = policy.check(Some(&value));

        // then (期待する結果):
        assert_eq!(result, Err(OriginRejection::Malformed));
    }
}
