//! Seed data served by the mock travel service

use std::sync::LazyLock;

use chrono::NaiveDate;

use crate::models::{Booking, BookingStatus, TravelPackage, User};

pub static PACKAGES: LazyLock<Vec<TravelPackage>> = LazyLock::new(|| {
    vec![
        package(
            "1",
            "Kyoto's Serene Temples",
            "Kyoto, Japan",
            7,
            2500.0,
            4.8,
            "Immerse yourself in the ancient culture of Kyoto. Visit serene temples, walk through bamboo forests, and experience a traditional tea ceremony.",
            "kyoto",
            &["culture", "history", "nature"],
        ),
        package(
            "2",
            "Santorini Sunset Escape",
            "Santorini, Greece",
            5,
            3200.0,
            4.9,
            "Witness the world-famous sunsets of Santorini. Explore the charming white-washed villages and relax on unique volcanic beaches.",
            "santorini",
            &["romance", "beach", "luxury"],
        ),
        package(
            "3",
            "Machu Picchu Adventure",
            "Cusco, Peru",
            10,
            4500.0,
            4.7,
            "Hike the legendary Inca Trail to the lost city of Machu Picchu. A true adventure for thrill-seekers and history buffs.",
            "machupicchu",
            &["adventure", "hiking", "history"],
        ),
        package(
            "4",
            "Northern Lights Spectacle",
            "Tromsø, Norway",
            6,
            3800.0,
            4.9,
            "Chase the elusive Aurora Borealis in the Arctic circle. Enjoy dog sledding, reindeer feeding, and stunning fjord landscapes.",
            "norway",
            &["winter", "nature", "adventure"],
        ),
        package(
            "5",
            "Swiss Alps Grandeur",
            "Interlaken, Switzerland",
            8,
            4200.0,
            4.8,
            "Experience the breathtaking beauty of the Swiss Alps. From scenic train rides to exhilarating mountain peaks, it's a nature lover's dream.",
            "switzerland",
            &["mountains", "nature", "hiking"],
        ),
        package(
            "6",
            "New York City Lights",
            "New York, USA",
            5,
            2800.0,
            4.6,
            "Explore the city that never sleeps. See iconic landmarks, catch a Broadway show, and indulge in world-class cuisine.",
            "newyork",
            &["city", "culture", "food"],
        ),
    ]
});

pub static USER: LazyLock<User> = LazyLock::new(|| User {
    id: "user123".to_string(),
    name: "Alex Wanderer".to_string(),
    email: "alex.wanderer@example.com".to_string(),
    loyalty_points: 1500,
});

pub static BOOKINGS: LazyLock<Vec<Booking>> = LazyLock::new(|| {
    vec![
        booking(
            "booking1",
            "1",
            "Kyoto's Serene Temples",
            date(2024, 5, 10),
            date(2024, 9, 15),
            2,
            BookingStatus::Upcoming,
        ),
        booking(
            "booking2",
            "3",
            "Machu Picchu Adventure",
            date(2023, 11, 20),
            date(2024, 3, 1),
            1,
            BookingStatus::Completed,
        ),
        booking(
            "booking3",
            "4",
            "Northern Lights Spectacle",
            date(2024, 6, 1),
            date(2024, 12, 20),
            2,
            BookingStatus::Upcoming,
        ),
    ]
});

#[allow(clippy::too_many_arguments)]
fn package(
    id: &str,
    name: &str,
    destination: &str,
    duration: u32,
    price: f64,
    rating: f32,
    description: &str,
    image_seed: &str,
    tags: &[&str],
) -> TravelPackage {
    TravelPackage {
        id: id.to_string(),
        name: name.to_string(),
        destination: destination.to_string(),
        duration,
        price,
        rating,
        description: description.to_string(),
        image: format!("https://picsum.photos/seed/{image_seed}/800/600"),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
    }
}

fn booking(
    id: &str,
    package_id: &str,
    package_name: &str,
    booking_date: NaiveDate,
    trip_date: NaiveDate,
    travelers: u32,
    status: BookingStatus,
) -> Booking {
    Booking {
        id: id.to_string(),
        package_id: package_id.to_string(),
        package_name: package_name.to_string(),
        user_id: USER.id.clone(),
        booking_date,
        trip_date,
        travelers,
        status,
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("seed dates are valid calendar dates")
}
