//! The donation page.
//!
//! A single self-contained HTML document. The browser does the heavy lifting: it
//! assembles the tagged `transfer` call-data (the same layout
//! [`gitpay_primitives::encode_tagged_transfer`] produces) and submits it through
//! the wallet extension via `window.ethereum`. The server only fills in the
//! recipient, token and tag constants.

use alloy_primitives::{Address, hex};
use gitpay_chain::token::TokenMetadata;
use gitpay_primitives::{PAYMENT_TAG, TRANSFER_SELECTOR};

/// Renders the donation page for a resolved recipient.
pub fn render_donate_page(
    name: &str,
    recipient: Address,
    token: &TokenMetadata,
    chain_id: u64,
) -> String {
    DONATE_HTML
        .replace("__NAME__", &escape_html(name))
        .replace("__RECIPIENT__", &recipient.to_checksum(None))
        .replace("__TOKEN__", &token.address.to_checksum(None))
        .replace("__SYMBOL__", &escape_html(&token.symbol))
        .replace("__DECIMALS__", &token.decimals.to_string())
        .replace("__CHAIN_ID__", &format!("0x{chain_id:x}"))
        .replace("__SELECTOR__", &hex::encode(TRANSFER_SELECTOR))
        .replace("__TAG__", &hex::encode(PAYMENT_TAG))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const DONATE_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Donate to __NAME__</title>
<style>
  body { font-family: ui-sans-serif, system-ui, sans-serif; max-width: 28rem; margin: 4rem auto; padding: 0 1rem; color: #1f2328; }
  h1 { font-size: 1.3rem; }
  label { display: block; margin-top: 1rem; font-size: .9rem; color: #656d76; }
  input { width: 100%; box-sizing: border-box; padding: .5rem; margin-top: .25rem; border: 1px solid #d0d7de; border-radius: 6px; font-size: 1rem; }
  button { margin-top: 1.25rem; padding: .6rem 1.4rem; border: 0; border-radius: 6px; background: #1a7f37; color: #fff; font-size: 1rem; cursor: pointer; }
  button:disabled { background: #8d96a0; cursor: default; }
  #status { margin-top: 1rem; font-size: .9rem; word-break: break-all; }
  code { background: #f6f8fa; padding: .1rem .3rem; border-radius: 4px; }
</style>
</head>
<body>
<h1>Donate __SYMBOL__ to __NAME__</h1>
<p>Recipient: <code>__RECIPIENT__</code></p>
<label for="amount">Amount (__SYMBOL__)</label>
<input id="amount" inputmode="decimal" placeholder="5.00">
<label for="memo">Memo (optional, goes on chain)</label>
<input id="memo" maxlength="120" placeholder="thanks!">
<button id="send">Donate</button>
<p id="status"></p>
<script>
const RECIPIENT = "__RECIPIENT__";
const TOKEN = "__TOKEN__";
const DECIMALS = __DECIMALS__;
const CHAIN_ID = "__CHAIN_ID__";
const SELECTOR = "__SELECTOR__";
const TAG = "__TAG__";

const pad = (hex) => hex.padStart(64, "0");

const memoHex = (text) =>
  Array.from(new TextEncoder().encode(text))
    .map((b) => b.toString(16).padStart(2, "0"))
    .join("");

// "1.5" at 6 decimals -> 1500000n; rejects more fractional digits than the token has.
function toBaseUnits(value) {
  const [whole, fraction = ""] = value.trim().split(".");
  if (!/^\d*$/.test(whole) || !/^\d*$/.test(fraction) || fraction.length > DECIMALS) {
    throw new Error("invalid amount");
  }
  return BigInt(whole || "0") * 10n ** BigInt(DECIMALS) + BigInt(fraction.padEnd(DECIMALS, "0") || "0");
}

function buildCallData(units, memo) {
  return "0x" + SELECTOR + pad(RECIPIENT.slice(2).toLowerCase()) + pad(units.toString(16)) + TAG + memoHex(memo);
}

async function donate() {
  const status = document.getElementById("status");
  const button = document.getElementById("send");
  if (!window.ethereum) {
    status.textContent = "No browser wallet found.";
    return;
  }
  try {
    const units = toBaseUnits(document.getElementById("amount").value);
    if (units === 0n) throw new Error("invalid amount");
    const memo = document.getElementById("memo").value.trim();

    button.disabled = true;
    status.textContent = "Confirm in your wallet…";

    const [from] = await window.ethereum.request({ method: "eth_requestAccounts" });
    await window.ethereum.request({
      method: "wallet_switchEthereumChain",
      params: [{ chainId: CHAIN_ID }],
    });
    const hash = await window.ethereum.request({
      method: "eth_sendTransaction",
      params: [{ from, to: TOKEN, data: buildCallData(units, memo) }],
    });
    status.textContent = "Sent: " + hash;
  } catch (err) {
    status.textContent = err.message || "Transaction rejected.";
  } finally {
    button.disabled = false;
  }
}

document.getElementById("send").addEventListener("click", donate);
</script>
</body>
</html>
"#;
