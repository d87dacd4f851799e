/// A customer the generator can attribute reviews to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerProfile {
    pub name: String,
    pub image: String,
    pub location: String,
}

/// Customers and review texts that generated reviews are drawn from
#[derive(Debug, Clone)]
pub struct SampleData {
    pub customers: Vec<CustomerProfile>,
    pub review_texts: Vec<String>,
}

fn avatar(photo: &str) -> String {
    format!(
        "https://images.unsplash.com/{}?w=60&h=60&fit=crop&crop=face",
        photo
    )
}

fn customer(name: &str, photo: &str, location: &str) -> CustomerProfile {
    CustomerProfile {
        name: name.to_string(),
        image: avatar(photo),
        location: location.to_string(),
    }
}

const REVIEW_TEXTS: [&str; 20] = [
    "Absolutely love these bangles! The quality is exceptional and they look even better in person.",
    "Perfect for my wedding! Got so many compliments. The craftsmanship is outstanding.",
    "Beautiful traditional designs with a modern touch. Exactly what I was looking for.",
    "The packaging was so elegant and the bangles arrived safely. Great customer service!",
    "These bangles are stunning! The colors are vibrant and they fit perfectly.",
    "High-quality materials and excellent finish. Worth every penny!",
    "Fast delivery and beautiful products. Will definitely order again for festivals.",
    "The attention to detail is remarkable. Each bangle is a piece of art!",
    "Comfortable to wear all day and the design is timeless. Highly recommended!",
    "Excellent value for money. The bangles look much more expensive than they are.",
    "Perfect gift for my sister. She loved them! The sizing was accurate.",
    "Great collection for traditional occasions. The gold plating is very durable.",
    "Lightweight yet sturdy. Perfect for daily wear as well as special occasions.",
    "The customer support team was very helpful in helping me choose the right size.",
    "Beautiful craftsmanship! These bangles have become my favorite accessory.",
    "Quick delivery and secure packaging. The bangles exceeded my expectations.",
    "Authentic traditional designs with excellent finishing. Very happy with my purchase!",
    "The bangles are even more beautiful in person. Photos don't do them justice!",
    "Perfect for bridal wear. The intricate designs are absolutely gorgeous.",
    "Great quality and beautiful designs. Will be purchasing more for my collection.",
];

impl Default for SampleData {
    fn default() -> Self {
        Self {
            customers: vec![
                customer("Priya Sharma", "photo-1494790108755-2616b612b672", "Mumbai"),
                customer("Anita Patel", "photo-1438761681033-6461ffad8d80", "Delhi"),
                customer("Meera Gupta", "photo-1489424731084-a5d8b219a5bb", "Bangalore"),
                customer("Sneha Reddy", "photo-1544725176-7c40e5a71c5e", "Hyderabad"),
                customer("Riya Singh", "photo-1534528741775-53994a69daeb", "Kolkata"),
                customer("Divya Kumar", "photo-1517841905240-472988babdf9", "Chennai"),
                customer("Pooja Mehta", "photo-1517365830460-955ce3ccd263", "Ahmedabad"),
                customer("Neha Joshi", "photo-1517841905240-472988babdf9", "Pune"),
            ],
            review_texts: REVIEW_TEXTS.iter().map(|t| t.to_string()).collect(),
        }
    }
}
