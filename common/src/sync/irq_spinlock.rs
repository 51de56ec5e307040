use core::{
    marker::PhantomData,
    mem::ManuallyDrop,
    ops::{Deref, DerefMut},
};

use spin::{Mutex, MutexGuard};

use super::irq::IrqControl;

/// IRQ-safe spinlock.
///
/// - Disables interrupts on lock
/// - Spins until acquired
/// - Releases the lock, then restores interrupt state on drop
///
/// Safe to use from:
/// - IRQ context
/// - Normal kernel context
///
/// Not fair. Not reentrant: taking the lock again from inside a guard's
/// scope (including from an interrupt handler running under it) deadlocks.
pub struct IrqSpinLock<T, I: IrqControl> {
    inner: Mutex<T>,
    _irq: PhantomData<fn() -> I>,
}

impl<T, I: IrqControl> IrqSpinLock<T, I> {
    /// Create a new IRQ-safe spinlock.
    pub const fn new(data: T) -> Self {
        Self {
            inner: Mutex::new(data),
            _irq: PhantomData,
        }
    }

    /// Acquire the lock with interrupts disabled.
    pub fn lock(&self) -> IrqSpinLockGuard<'_, T, I> {
        // Interrupts go off before we spin, so a handler that wants the
        // same lock can never preempt the holder on this core.
        let irq_state = I::disable();
        let guard = self.inner.lock();

        IrqSpinLockGuard {
            guard: ManuallyDrop::new(guard),
            irq_state,
        }
    }
}

/// Guard returned by `IrqSpinLock::lock`.
///
/// Restores interrupt state on drop.
pub struct IrqSpinLockGuard<'a, T, I: IrqControl> {
    guard: ManuallyDrop<MutexGuard<'a, T>>,
    irq_state: I::State,
}

impl<T, I: IrqControl> Deref for IrqSpinLockGuard<'_, T, I> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

impl<T, I: IrqControl> DerefMut for IrqSpinLockGuard<'_, T, I> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.guard
    }
}

impl<T, I: IrqControl> Drop for IrqSpinLockGuard<'_, T, I> {
    fn drop(&mut self) {
        // SAFETY: the guard is dropped exactly once, here, and never
        // touched afterwards.
        unsafe { ManuallyDrop::drop(&mut self.guard) };

        I::restore(self.irq_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static ENABLED: Cell<bool> = const { Cell::new(true) };
    }

    struct TestIrq;

    impl IrqControl for TestIrq {
        type State = bool;

        fn disable() -> bool {
            ENABLED.with(|e| e.replace(false))
        }

        fn restore(prev_enabled: bool) {
            ENABLED.with(|e| e.set(prev_enabled));
        }
    }

    fn irqs_enabled() -> bool {
        ENABLED.with(|e| e.get())
    }

    #[test]
    fn lock_masks_interrupts_until_guard_drops() {
        let lock: IrqSpinLock<u32, TestIrq> = IrqSpinLock::new(7);

        {
            let mut guard = lock.lock();
            assert!(!irqs_enabled());
            *guard += 1;
        }

        assert!(irqs_enabled());
        assert_eq!(*lock.lock(), 8);
    }

    #[test]
    fn nested_critical_sections_restore_outer_state() {
        let a: IrqSpinLock<(), TestIrq> = IrqSpinLock::new(());
        let b: IrqSpinLock<(), TestIrq> = IrqSpinLock::new(());

        let outer = a.lock();
        {
            let _inner = b.lock();
            assert!(!irqs_enabled());
        }
        // Inner guard saw interrupts already off and must not turn them on.
        assert!(!irqs_enabled());
        drop(outer);
        assert!(irqs_enabled());
    }
}
