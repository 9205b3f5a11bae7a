/*!
 * Remote token introspection
 *
 * Responsibility:
 * - provider の tokeninfo / userinfo endpoint を呼び、結果を verdict に畳み込む
 * - 通信・parse の失敗は呼び出し側に漏らさず invalid verdict にする
 *
 * Public API:
 * - TokenIntrospector (middleware から見える seam)
 * - ProviderIntrospector
 * - TokenVerdict / UserProfile
 */

mod core;
mod types;

pub use self::core::{IntrospectionError, ProviderIntrospector, TokenIntrospector, evaluate_tokeninfo};
pub use self::types::{TokenVerdict, UserProfile};
