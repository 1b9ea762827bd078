//! Reply selection for a matched intent.

use cb_protocol::ReplyPolicy;
use rand::Rng;
use rand::seq::SliceRandom;

use super::IntentTable;

impl IntentTable {
    /// Reply for `tag` under `policy`. `None` only for a tag not in the table.
    pub fn reply_for(&self, tag: &str, policy: ReplyPolicy) -> Option<&str> {
        self.reply_with(tag, policy, &mut rand::thread_rng())
    }

    /// Like [`reply_for`](Self::reply_for) with a caller-supplied RNG.
    pub fn reply_with<R: Rng + ?Sized>(
        &self,
        tag: &str,
        policy: ReplyPolicy,
        rng: &mut R,
    ) -> Option<&str> {
        let responses = self.responses(tag)?;
        let reply = match policy {
            ReplyPolicy::First => responses.first(),
            ReplyPolicy::Random => responses.choose(rng),
        };
        reply.map(String::as_str)
    }
}
