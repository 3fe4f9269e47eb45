use fake::Fake;
use fake::faker::lorem::en::{Sentences, Word};
use rand::{Rng, RngCore};

const ADJECTIVES: &[&str] = &[
    "Small",
    "Ergonomic",
    "Rustic",
    "Intelligent",
    "Gorgeous",
    "Incredible",
    "Fantastic",
    "Practical",
    "Sleek",
    "Awesome",
    "Generic",
    "Handcrafted",
    "Handmade",
    "Licensed",
    "Refined",
    "Unbranded",
    "Tasty",
];

const MATERIALS: &[&str] = &[
    "Steel", "Wooden", "Concrete", "Plastic", "Cotton", "Granite", "Rubber", "Metal", "Soft",
    "Fresh", "Frozen",
];

const PRODUCTS: &[&str] = &[
    "Chair", "Car", "Computer", "Keyboard", "Mouse", "Bike", "Ball", "Gloves", "Pants", "Shirt",
    "Table", "Shoes", "Hat", "Towels", "Soap", "Tuna", "Chicken", "Fish", "Cheese", "Bacon",
    "Pizza", "Salad", "Sausages", "Chips",
];

const IMAGE_HOST: &str = "https://picsum.photos";

/// Supplier of human-readable filler text for generated records.
pub trait TextSource: Send + Sync {
    /// Commerce-style product name, e.g. `Rustic Granite Chair`.
    fn product_name(&self, rng: &mut dyn RngCore) -> String;

    fn product_description(&self, rng: &mut dyn RngCore) -> String;

    fn word(&self, rng: &mut dyn RngCore) -> String;

    fn image_url(&self, width: u32, height: u32, rng: &mut dyn RngCore) -> String;
}

/// Text source backed by the `fake` lorem generators.
#[derive(Debug, Clone, Copy, Default)]
pub struct FakerTextSource;

impl TextSource for FakerTextSource {
    fn product_name(&self, rng: &mut dyn RngCore) -> String {
        format!(
            "{} {} {}",
            pick(ADJECTIVES, rng),
            pick(MATERIALS, rng),
            pick(PRODUCTS, rng)
        )
    }

    fn product_description(&self, rng: &mut dyn RngCore) -> String {
        let sentences: Vec<String> = Sentences(2..4).fake_with_rng(rng);
        sentences.join(" ")
    }

    fn word(&self, rng: &mut dyn RngCore) -> String {
        Word().fake_with_rng(rng)
    }

    fn image_url(&self, width: u32, height: u32, rng: &mut dyn RngCore) -> String {
        let seed = rng.random::<u32>();
        format!("{IMAGE_HOST}/seed/{seed:08x}/{width}/{height}")
    }
}

fn pick(values: &[&'static str], rng: &mut dyn RngCore) -> &'static str {
    values[rng.random_range(0..values.len())]
}
