/// A trait for objects that can be transformed by a given type.
///
/// In this crate the transform is a homogeneous 2D matrix (`&Matrix3<T>`),
/// applied to every control point.
pub trait Transformable<T>: Clone {
    fn transform(&mut self, transform: T);

    fn transformed(&self, transform: T) -> Self {
        let mut clone = self.clone();
        clone.transform(transform);
        clone
    }
}
