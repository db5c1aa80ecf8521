//! The single logical random stream of the simulation.
//!
//! Every stochastic decision in the engine draws from a thread-local
//! [`SmallRng`] seeded from one global source, so a run is reproducible from
//! [`set_seed`] when determinism is requested.

use rand::distr::{Distribution, StandardUniform, uniform::SampleUniform};
use rand::rngs::{SmallRng, SysRng};
use rand::seq::SliceRandom;
use rand::{Rng, RngExt, SeedableRng};
use std::cell::RefCell;
use std::ops::Range;
use std::sync::{Arc, LazyLock, Mutex};

static GLOBAL_RNG: LazyLock<Arc<Mutex<SmallRng>>> =
    LazyLock::new(|| Arc::new(Mutex::new(SmallRng::try_from_rng(&mut SysRng).unwrap())));

thread_local! {
    static TLS_RNG: RefCell<SmallRng> = RefCell::new({
        let mut global = GLOBAL_RNG.lock().unwrap();
        SmallRng::seed_from_u64(global.next_u64())
    });
}

/// Seeds the thread-local random number generator with the given seed.
pub fn set_seed(seed: u64) {
    let mut global = GLOBAL_RNG.lock().unwrap();
    *global = SmallRng::seed_from_u64(seed);
    TLS_RNG.with(|cell| {
        *cell.borrow_mut() = SmallRng::seed_from_u64(seed);
    });
}

/// Runs `f` with the thread-local generator seeded to `seed`, then restores
/// the previous generator state. Intended for deterministic test sections.
pub fn scoped_seed<R>(seed: u64, f: impl FnOnce() -> R) -> R {
    let original = TLS_RNG.with(|cell| {
        let mut rng = cell.borrow_mut();
        let original = rng.clone();
        *rng = SmallRng::seed_from_u64(seed);
        original
    });

    let result = f();

    TLS_RNG.with(|cell| {
        *cell.borrow_mut() = original;
    });

    result
}

/// For floating point types the value is uniform on `[0, 1)`.
#[inline(always)]
pub fn random<T>() -> T
where
    StandardUniform: Distribution<T>,
{
    TLS_RNG.with(|cell| cell.borrow_mut().random())
}

/// `true` with the given probability. `prob` outside `[0, 1]` is clamped.
#[inline(always)]
pub fn bool(prob: f32) -> bool {
    TLS_RNG.with(|cell| cell.borrow_mut().random_bool(prob.clamp(0.0, 1.0) as f64))
}

/// Uniform value in the given half-open range.
pub fn range<T>(range: Range<T>) -> T
where
    T: SampleUniform + PartialOrd,
{
    TLS_RNG.with(|cell| cell.borrow_mut().random_range(range))
}

/// A uniformly chosen item of a non-empty slice.
pub fn choose<T>(items: &[T]) -> &T {
    let index = range(0..items.len());
    &items[index]
}

/// Shuffles the given slice in place.
pub fn shuffle<T>(items: &mut [T]) {
    TLS_RNG.with(|cell| items.shuffle(&mut *cell.borrow_mut()));
}

/// Indexes `0..len` in uniformly random order.
pub fn visit_order(len: usize) -> Vec<usize> {
    let mut indices = (0..len).collect::<Vec<usize>>();
    shuffle(&mut indices);
    indices
}
