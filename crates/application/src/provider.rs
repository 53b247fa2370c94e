use std::cell::{Ref, RefCell, RefMut};
use std::rc::{Rc, Weak};

use crate::StyleContext;

const OUTSIDE_PROVIDER: &str = "style context used outside of a StyleProvider";

/// Owns the style context for one UI session and hands out consumer handles.
pub struct StyleProvider {
    context: Rc<RefCell<StyleContext>>,
}

impl StyleProvider {
    pub fn new(context: StyleContext) -> Self {
        Self {
            context: Rc::new(RefCell::new(context)),
        }
    }

    pub fn consumer(&self) -> StyleConsumer {
        StyleConsumer {
            context: Rc::downgrade(&self.context),
        }
    }

    pub fn context(&self) -> Ref<'_, StyleContext> {
        self.context.borrow()
    }

    pub fn context_mut(&self) -> RefMut<'_, StyleContext> {
        self.context.borrow_mut()
    }
}

/// Handle held by pages and components.
///
/// Reaching the context through a handle that was never bound to a provider,
/// or whose provider has been dropped, is a programming error and panics.
#[derive(Clone)]
pub struct StyleConsumer {
    context: Weak<RefCell<StyleContext>>,
}

impl StyleConsumer {
    pub fn detached() -> Self {
        Self {
            context: Weak::new(),
        }
    }

    pub fn is_bound(&self) -> bool {
        self.context.strong_count() > 0
    }

    pub fn with<R>(&self, f: impl FnOnce(&StyleContext) -> R) -> R {
        let context = self.context.upgrade().expect(OUTSIDE_PROVIDER);
        let borrowed = context.borrow();
        f(&borrowed)
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut StyleContext) -> R) -> R {
        let context = self.context.upgrade().expect(OUTSIDE_PROVIDER);
        let mut borrowed = context.borrow_mut();
        f(&mut borrowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style_context::tests::SharedStore;

    fn provider() -> StyleProvider {
        StyleProvider::new(StyleContext::new(Box::new(SharedStore::default())))
    }

    #[test]
    fn consumers_share_the_provider_state() {
        let provider = provider();
        let editor = provider.consumer();
        let display = provider.consumer();

        editor.with_mut(|context| context.apply_style("data:,styled".to_string()));

        let seen = display.with(|context| context.current_image().map(str::to_string));
        assert_eq!(seen.as_deref(), Some("data:,styled"));
        assert_eq!(provider.context().current_image(), Some("data:,styled"));
    }

    #[test]
    #[should_panic(expected = "outside of a StyleProvider")]
    fn detached_consumer_fails_fast() {
        StyleConsumer::detached().with(|context| context.revision());
    }

    #[test]
    #[should_panic(expected = "outside of a StyleProvider")]
    fn consumer_outliving_provider_fails_fast() {
        let consumer = provider().consumer();
        assert!(!consumer.is_bound());
        consumer.with_mut(|context| context.set_last_style_used(None));
    }
}
