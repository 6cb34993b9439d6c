/// Growing envelope for one crop: temperature bracket in °C and ideal relative humidity in %.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropProfile {
    pub name: &'static str,
    pub min_temp: f64,
    pub max_temp: f64,
    pub ideal_humidity: f64,
}

impl CropProfile {
    const fn new(name: &'static str, min_temp: f64, max_temp: f64, ideal_humidity: f64) -> Self {
        Self {
            name,
            min_temp,
            max_temp,
            ideal_humidity,
        }
    }

    pub fn tolerates(&self, temperature: f64) -> bool {
        self.min_temp <= temperature && temperature <= self.max_temp
    }
}

/// Reference table in ranking order. Some names are aliases with identical envelopes.
pub const CROP_TABLE: &[CropProfile] = &[
    CropProfile::new("Paddy (Rice)", 22.0, 35.0, 80.0),
    CropProfile::new("Rice", 22.0, 35.0, 80.0),
    CropProfile::new("Maize", 20.0, 30.0, 60.0),
    CropProfile::new("Wheat", 15.0, 25.0, 50.0),
    CropProfile::new("Barley", 15.0, 25.0, 50.0),
    CropProfile::new("Buckwheat", 18.0, 24.0, 70.0),
    CropProfile::new("Large Cardamom", 15.0, 25.0, 80.0),
    CropProfile::new("Ginger", 20.0, 30.0, 75.0),
    CropProfile::new("Turmeric", 20.0, 30.0, 75.0),
    CropProfile::new("Orange", 20.0, 30.0, 60.0),
    CropProfile::new("Mandarin", 20.0, 30.0, 60.0),
    CropProfile::new("Tomato", 18.0, 27.0, 65.0),
    CropProfile::new("Cabbage", 15.0, 21.0, 75.0),
    CropProfile::new("Cauliflower", 15.0, 21.0, 75.0),
    CropProfile::new("Peas", 10.0, 18.0, 60.0),
    CropProfile::new("Potato", 15.0, 20.0, 80.0),
    CropProfile::new("Sugarcane", 25.0, 35.0, 75.0),
    CropProfile::new("Soybean", 20.0, 30.0, 60.0),
    CropProfile::new("Cotton", 21.0, 32.0, 50.0),
    CropProfile::new("Mustard", 15.0, 25.0, 50.0),
    CropProfile::new("Groundnut", 20.0, 30.0, 60.0),
];

pub fn find(name: &str) -> Option<&'static CropProfile> {
    CROP_TABLE.iter().find(|crop| crop.name == name)
}
