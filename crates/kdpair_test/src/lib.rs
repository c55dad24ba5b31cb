use kdpair_nostd_internal::PointSet;
use ndarray::{Array2, ArrayView2, Axis};
use rand::distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;
use rand_xoshiro::rand_core::SeedableRng;

/// Owns the raw arrays used to build [`PointSet`]s in tests & benchmarks
pub struct TestPoints {
    // shape is (n_spatial_dims, n_points)
    position_list: Array2<f64>,
    weight_list: Vec<f64>,
    box_size: Option<Vec<f64>>,
}

impl TestPoints {
    pub fn new(positions: ArrayView2<f64>, weights: Option<&[f64]>, box_size: Option<&[f64]>) -> Self {
        let n_points = positions.len_of(Axis(1));
        let weight_list = if let Some(weight_slice) = weights {
            assert_eq!(weight_slice.len(), n_points);
            Vec::from(weight_slice)
        } else {
            vec![1.0; n_points]
        };
        TestPoints {
            position_list: positions.to_owned(),
            weight_list,
            box_size: box_size.map(Vec::from),
        }
    }

    /// Points distributed uniformly within `[0, box_length)` along each of
    /// `n_spatial_dims` axes, with weights drawn from `[0.5, 1.5)`.
    ///
    /// The domain is periodic when `periodic` is `true`.
    pub fn from_random(
        n_points: usize,
        n_spatial_dims: usize,
        box_length: f64,
        periodic: bool,
        seed: u64,
    ) -> TestPoints {
        let mut my_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let position_dist = Uniform::try_from(0.0..box_length).unwrap();
        let weight_dist = Uniform::try_from(0.5..1.5).unwrap();

        let position_list =
            Array2::from_shape_fn((n_spatial_dims, n_points), |_| position_dist.sample(&mut my_rng));
        let weight_list = (0..n_points)
            .map(|_| weight_dist.sample(&mut my_rng))
            .collect();
        TestPoints {
            position_list,
            weight_list,
            box_size: periodic.then(|| vec![box_length; n_spatial_dims]),
        }
    }

    /// replace every weight with a random integer from `1..=max_weight`
    ///
    /// Products & sums of small integers are exact in floating point, which
    /// lets tests compare weighted sums for equality.
    pub fn with_integer_weights(mut self, max_weight: u32, seed: u64) -> TestPoints {
        let mut my_rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let dist = Uniform::try_from(1..=max_weight).unwrap();
        for w in self.weight_list.iter_mut() {
            *w = f64::from(dist.sample(&mut my_rng));
        }
        self
    }

    /// multiply every weight by `factor`
    pub fn scale_weights(mut self, factor: f64) -> TestPoints {
        self.weight_list.iter_mut().for_each(|w| *w *= factor);
        self
    }

    pub fn n_points(&self) -> usize {
        self.position_list.len_of(Axis(1))
    }

    pub fn positions(&self) -> ArrayView2<f64> {
        self.position_list.view()
    }

    pub fn weights(&self) -> &[f64] {
        &self.weight_list
    }

    pub fn point_set(&self) -> PointSet {
        PointSet::new(
            self.position_list.view(),
            Some(&self.weight_list),
            self.box_size.as_deref(),
        )
        .unwrap()
    }

    /// like [`Self::point_set`], but always builds a non-periodic set
    pub fn open_point_set(&self) -> PointSet {
        PointSet::new(self.position_list.view(), Some(&self.weight_list), None).unwrap()
    }
}
