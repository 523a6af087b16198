use std::rc::Rc;

use gloo_timers::callback::Timeout;

/// Runs `callback` once `delay_ms` has passed without another `trigger`.
pub struct Debouncer {
    delay_ms: u32,
    callback: Rc<dyn Fn()>,
    // Dropping a Timeout cancels it.
    pending: Option<Timeout>,
}

impl Debouncer {
    pub fn new(delay_ms: u32, callback: impl Fn() + 'static) -> Self {
        Self {
            delay_ms,
            callback: Rc::new(callback),
            pending: None,
        }
    }

    pub fn trigger(&mut self) {
        let callback = Rc::clone(&self.callback);
        // A fired Timeout stays in `pending` until the next trigger; clearing
        // an expired timer is a no-op.
        self.pending = Some(Timeout::new(self.delay_ms, move || callback()));
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    use super::Debouncer;

    wasm_bindgen_test_configure!(run_in_browser);

    fn counting(delay_ms: u32) -> (Debouncer, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let debouncer = Debouncer::new(delay_ms, move || counter.set(counter.get() + 1));
        (debouncer, calls)
    }

    #[wasm_bindgen_test]
    async fn burst_runs_callback_once() {
        let (mut debouncer, calls) = counting(50);
        for _ in 0..5 {
            debouncer.trigger();
        }
        assert_eq!(calls.get(), 0);

        TimeoutFuture::new(150).await;
        assert_eq!(calls.get(), 1);
    }

    #[wasm_bindgen_test]
    async fn retrigger_restarts_quiet_period() {
        let (mut debouncer, calls) = counting(100);
        debouncer.trigger();
        TimeoutFuture::new(60).await;
        debouncer.trigger();
        TimeoutFuture::new(60).await;
        assert_eq!(calls.get(), 0);

        TimeoutFuture::new(100).await;
        assert_eq!(calls.get(), 1);
    }

    #[wasm_bindgen_test]
    async fn separate_bursts_run_separately() {
        let (mut debouncer, calls) = counting(30);
        debouncer.trigger();
        TimeoutFuture::new(90).await;
        debouncer.trigger();
        debouncer.trigger();
        TimeoutFuture::new(90).await;
        assert_eq!(calls.get(), 2);
    }

    #[wasm_bindgen_test]
    async fn drop_cancels_pending_run() {
        let (mut debouncer, calls) = counting(30);
        debouncer.trigger();
        drop(debouncer);

        TimeoutFuture::new(90).await;
        assert_eq!(calls.get(), 0);
    }
}
