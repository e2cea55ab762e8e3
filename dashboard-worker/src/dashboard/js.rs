//! Dashboard JavaScript
//!
//! The page works without script; this only adds:
//! - Busy state on form submit (buttons disabled, progress text shown)
//! - Force Buy button label tracking the selected coin

pub const SCRIPT: &str = r"
// ============================================================================
// Busy state while a form round-trips to the Worker
// ============================================================================
function markBusy(form) {
    form.classList.add('busy');
    form.querySelectorAll('button').forEach(btn => { btn.disabled = true; });
}

document.querySelectorAll('form[data-busy]').forEach(form => {
    form.addEventListener('submit', () => {
        // Let the browser collect the form values before disabling
        setTimeout(() => markBusy(form), 0);
    });
});

// ============================================================================
// Force Buy
// ============================================================================
const coinSelect = document.getElementById('forceBuyCoin');
const forceBuyBtn = document.getElementById('forceBuyBtn');

function syncForceBuy() {
    if (!coinSelect || !forceBuyBtn) return;
    const coin = coinSelect.value;
    forceBuyBtn.disabled = coin === '';
    forceBuyBtn.textContent = coin ? 'Force Buy ' + coin : 'Force Buy';
}

if (coinSelect) {
    coinSelect.addEventListener('change', syncForceBuy);
    syncForceBuy();
}
";
