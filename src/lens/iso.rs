//! Invertible transforms.

use std::rc::Rc;

/// A pair of mutually inverse functions between `A` and `B`.
pub struct Iso<A, B> {
    fw: Rc<dyn Fn(&A) -> B>,
    bw: Rc<dyn Fn(&B) -> A>,
}

impl<A, B> Clone for Iso<A, B> {
    fn clone(&self) -> Self {
        Self {
            fw: self.fw.clone(),
            bw: self.bw.clone(),
        }
    }
}

impl<A: 'static, B: 'static> Iso<A, B> {
    pub fn new<F, G>(fw: F, bw: G) -> Self
    where
        F: Fn(&A) -> B + 'static,
        G: Fn(&B) -> A + 'static,
    {
        Self {
            fw: Rc::new(fw),
            bw: Rc::new(bw),
        }
    }

    pub fn fw(&self, a: &A) -> B {
        (self.fw)(a)
    }

    pub fn bw(&self, b: &B) -> A {
        (self.bw)(b)
    }

    /// The same transform, run the other way.
    pub fn inv(&self) -> Iso<B, A> {
        Iso {
            fw: self.bw.clone(),
            bw: self.fw.clone(),
        }
    }

    /// `self` followed by `next`.
    pub fn then<C: 'static>(&self, next: &Iso<B, C>) -> Iso<A, C> {
        let (f1, f2) = (self.fw.clone(), next.fw.clone());
        let (b1, b2) = (self.bw.clone(), next.bw.clone());
        Iso {
            fw: Rc::new(move |a: &A| f2(&f1(a))),
            bw: Rc::new(move |c: &C| b1(&b2(c))),
        }
    }
}

impl Iso<f64, f64> {
    /// Multiply by `k` going forward. `k` must be nonzero.
    pub fn scale(k: f64) -> Self {
        Iso::new(move |a| a * k, move |b| b / k)
    }

    /// Add `d` going forward.
    pub fn offset(d: f64) -> Self {
        Iso::new(move |a| a + d, move |b| b - d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fw_bw() {
        let percent = Iso::scale(100.0);
        assert_eq!(percent.fw(&0.25), 25.0);
        assert_eq!(percent.bw(&50.0), 0.5);
    }

    #[test]
    fn test_inv() {
        let to_string = Iso::new(|n: &i32| n.to_string(), |s: &String| s.parse().unwrap_or(0));
        let parse = to_string.inv();
        assert_eq!(parse.fw(&"12".to_string()), 12);
        assert_eq!(parse.bw(&7), "7");
    }

    #[test]
    fn test_then() {
        let iso = Iso::offset(1.0).then(&Iso::scale(2.0));
        assert_eq!(iso.fw(&3.0), 8.0);
        assert_eq!(iso.bw(&8.0), 3.0);
    }
}
