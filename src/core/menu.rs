//! A full day of dishes keyed on the Sun, Moon and Ascendant signs.

use crate::domain::model::ZodiacSign;
use serde::Serialize;

struct Dish {
    name: &'static str,
    description: &'static str,
    /// `{sign}` is replaced with the keyed sign's name.
    explanation: &'static str,
}

const BREAKFASTS: [Dish; 12] = [
    Dish {
        name: "Fiery Aries Breakfast Scramble",
        description: "A spicy chorizo and red pepper scramble to kickstart the day with energy and passion.",
        explanation: "Your {sign} Sun provides your core energy. This fiery, protein-packed breakfast with a little spice from the chorizo resonates with Aries' cardinal fire energy, getting your day started quickly and decisively. The vibrant red colors also align with Mars-ruled Aries.",
    },
    Dish {
        name: "Decadent Taurus Toast",
        description: "Thick-cut brioche French toast with high-quality maple syrup and a dusting of cinnamon.",
        explanation: "As a {sign}, you appreciate comfort and quality. This luxurious but simple breakfast appeals to your Venusian side. It's a sensual, grounding meal that provides steady, delicious energy, satisfying your earthy nature.",
    },
    Dish {
        name: "Gemini Breakfast Tapas",
        description: "A plate with a variety of small bites: a mini-quiche, some fruit, a slice of cheese, and a small pastry.",
        explanation: "Your {sign} Sun loves variety and information. Instead of one big meal, this tapas-style plate lets you sample many different flavors and textures, keeping your curious, air-sign nature engaged and preventing boredom.",
    },
    Dish {
        name: "Comforting Cancer Oatmeal",
        description: "A warm bowl of creamy oatmeal with milk, honey, and a swirl of berry jam.",
        explanation: "Your {sign} is ruled by the Moon, which seeks comfort and emotional nourishment. This classic, nurturing breakfast is like a warm hug in a bowl, providing the gentle, comforting start to the day that your Cancerian nature craves.",
    },
    Dish {
        name: "Golden Leo Sunshine Porridge",
        description: "A vibrant porridge with turmeric, apricot compote, and a sunburst pattern of sunflower seeds.",
        explanation: "Your {sign} Sun shines brightly. This visually stunning, golden-hued breakfast directly resonates with your ruling planet, the Sun. It's a dramatic, creative, and heart-healthy meal that appeals to your flair for the theatrical.",
    },
    Dish {
        name: "Virgo Vitality Green Smoothie",
        description: "A meticulously balanced green smoothie with spinach, banana, almond milk, and a scoop of protein powder.",
        explanation: "As a health-conscious, earth-sign {sign}, you appreciate efficiency and purity. This smoothie is a quick, nutrient-dense, and perfectly balanced meal that provides clean energy, aligning with your desire for physical and digestive well-being.",
    },
    Dish {
        name: "Balanced Libra Breakfast Bowl",
        description: "A beautiful yogurt bowl with perfectly arranged berries, granola, and a drizzle of honey.",
        explanation: "Your {sign} seeks harmony and beauty. This aesthetically pleasing breakfast bowl is all about balance, of flavor, texture, and nutrition. Its artful presentation appeals to your Venus-ruled eye for elegance.",
    },
    Dish {
        name: "Intense Scorpio Shakshuka",
        description: "Eggs poached in a rich, spicy tomato and pepper sauce with a hint of smoked paprika.",
        explanation: "Your {sign} craves depth and intensity. Shakshuka's deep, complex flavors and rich, dark red color resonate with Scorpio's mysterious and powerful nature. It's a passionate and satisfying dish.",
    },
    Dish {
        name: "Sagittarius Global Breakfast Burrito",
        description: "A breakfast burrito filled with eggs, black beans, avocado, and a dash of exotic hot sauce.",
        explanation: "Your {sign} loves adventure and exploring different cultures. This breakfast burrito is a portable meal that incorporates international flavors, satisfying your Jupiter-ruled desire for expansion and worldly experiences.",
    },
    Dish {
        name: "Classic Capricorn Breakfast",
        description: "A traditional breakfast of eggs, high-quality toast, and a side of smoked salmon or bacon.",
        explanation: "As a {sign}, you value tradition, structure, and quality. This no-fuss, classic breakfast is built on high-quality staple ingredients. It's a reliable, respectable, and grounding meal that provides the fuel for a productive day.",
    },
    Dish {
        name: "Aquarian Future-Toast",
        description: "Avocado toast on artisan sourdough, topped with nutritional yeast and hemp seeds.",
        explanation: "Your {sign} is innovative and forward-thinking. This modern classic takes a familiar concept and updates it with nutritious, slightly unconventional ingredients like nutritional yeast and hemp seeds, appealing to your intellectual and progressive nature.",
    },
    Dish {
        name: "Dreamy Pisces Smoothie Bowl",
        description: "A beautiful, swirled smoothie bowl with blue spirulina, banana, and topped with coconut flakes and berries.",
        explanation: "Your {sign} is imaginative and connected to the ethereal. The dreamy, watercolor-like appearance of this smoothie bowl with blue spirulina appeals to your artistic side. It's a light, hydrating, and magical-looking meal to ease you into your day.",
    },
];

const LUNCHES: [Dish; 12] = [
    Dish {
        name: "Aries Quick-Fire Quesadilla",
        description: "A quickly made quesadilla with spicy chicken and pepper jack cheese.",
        explanation: "Your {sign} Moon needs quick emotional satisfaction. A quesadilla is fast, hot, and satisfying, reflecting the impulsive and fiery nature of Aries. It provides an immediate comfort fix.",
    },
    Dish {
        name: "Grounding Taurus Lunch Bowl",
        description: "A hearty bowl with root vegetables, whole grains, and a creamy tahini dressing.",
        explanation: "Your {sign} Moon finds security in sensory comfort and stability. This earthy, substantial bowl with grounding root vegetables helps you feel nurtured and connected to the earth, satisfying your need for tangible comfort.",
    },
    Dish {
        name: "Gemini 'Chatterbox' Salad",
        description: "A salad with a multitude of ingredients: various greens, nuts, seeds, veggies, and a light vinaigrette.",
        explanation: "Your {sign} Moon is intellectually and emotionally restless. This salad, with its wide variety of ingredients, gives your mind plenty to process and keeps your palate from getting bored, satisfying your need for mental stimulation.",
    },
    Dish {
        name: "Nostalgic Cancer Tomato Soup",
        description: "A classic, creamy tomato soup, perhaps served with a grilled cheese for dipping.",
        explanation: "Your {sign} Moon is in its home sign of Cancer, craving nostalgia and emotional safety. Tomato soup is a universally comforting, childhood-favorite food that provides a deep sense of warmth, security, and care.",
    },
    Dish {
        name: "Leo's 'Center Stage' Salad",
        description: "A vibrant salad with grilled chicken or salmon, colorful bell peppers, and a bold, sunny lemon vinaigrette.",
        explanation: "Your {sign} Moon needs to feel special and recognized. This is not a boring side salad; it's a main-event salad, full of vibrant, high-quality ingredients. Its 'star power' provides the emotional boost of feeling celebrated.",
    },
    Dish {
        name: "The Virgo 'Clean Slate' Bowl",
        description: "A clean, simple quinoa bowl with steamed vegetables, chickpeas, and a light lemon-herb dressing.",
        explanation: "Your {sign} Moon feels emotionally secure when your body feels clean and in order. This simple, healthy, and easily digestible meal helps reset your system, providing the emotional comfort of feeling pure and efficient.",
    },
    Dish {
        name: "Harmonious Libra Bento Box",
        description: "An elegant bento box with balanced portions of rice, a small piece of fish, a seaweed salad, and pickled ginger.",
        explanation: "Your {sign} Moon seeks emotional equilibrium and peace. The bento box is the epitome of balance and harmony, with each component separate yet complementary. It's a visually pleasing and peaceful meal.",
    },
    Dish {
        name: "Scorpio Detox Broth",
        description: "A flavorful, dark mushroom and miso broth with slices of tofu and scallions.",
        explanation: "Your {sign} Moon needs to feel emotionally cleansed and powerful. This intense, flavorful, and deeply savory broth has a purifying quality. It helps you reset emotionally, satisfying Scorpio's need for transformation.",
    },
    Dish {
        name: "Adventurous Sagittarius Buddha Bowl",
        description: "A colorful Buddha bowl with ingredients from different cuisines, like edamame, corn salsa, and spiced chickpeas.",
        explanation: "Your {sign} Moon is optimistic and freedom-seeking. This bowl is a mini-adventure, combining different flavors and cultures in one dish. It satisfies your emotional need for exploration and wide-open spaces.",
    },
    Dish {
        name: "The Architect's Earth Bowl",
        description: "A structured bowl with a base of brown rice, topped with roasted broccoli, lentils, and a sprinkle of goat cheese.",
        explanation: "Your {sign} Moon in Capricorn finds comfort in structure and discipline. This is a well-built, reliable, and nourishing meal. Its earthy and traditional ingredients provide a sense of being grounded and capable.",
    },
    Dish {
        name: "Aquarian Community Bowl",
        description: "A grain bowl with unusual ingredients like spirulina-dusted chickpeas or seaweed flakes.",
        explanation: "Your {sign} Moon feels connected through intellectual and group ideals. This bowl, with its slightly unconventional and 'good-for-humanity' ingredients, helps you feel emotionally aligned with your progressive values.",
    },
    Dish {
        name: "Soothing Pisces Miso Soup",
        description: "A simple, light, and hydrating miso soup with soft tofu and seaweed.",
        explanation: "Your {sign} Moon is sensitive and needs to feel connected to the flow of the universe. This light, watery soup is spiritually and physically hydrating. It's a gentle meal that soothes the soul and calms the emotional tides.",
    },
];

const DINNERS: [Dish; 12] = [
    Dish {
        name: "Pioneering Aries Steak",
        description: "A perfectly grilled steak with a fiery peppercorn sauce, served with bold asparagus spears.",
        explanation: "Your {sign} Ascendant is how you project yourself to the world. This is a bold, confident, no-fuss meal that says 'I'm here.' It's a primal, energetic dish that showcases your direct and pioneering spirit.",
    },
    Dish {
        name: "Taurus 'Slow and Low' Pot Roast",
        description: "A slow-cooked pot roast with root vegetables, rich in flavor and fork-tender.",
        explanation: "Your {sign} Ascendant projects an aura of calm, stability, and sensuality. This slow-cooked, classic meal is the essence of earthy abundance. It's a dish that takes its time, promising deep satisfaction and comfort.",
    },
    Dish {
        name: "Communicative Gemini Dinner Party Pasta",
        description: "A light, versatile pasta with a variety of fresh herbs, cherry tomatoes, and a choice of protein.",
        explanation: "Your {sign} Ascendant is sociable and adaptable. This is a perfect dish for sharing and conversation. It's light, not too heavy, and offers variety, allowing for easy interaction and a lively dinner atmosphere.",
    },
    Dish {
        name: "Nurturing Cancer Roast Chicken",
        description: "A whole roasted chicken with lemon and herbs, served with creamy mashed potatoes.",
        explanation: "Your {sign} Ascendant gives you a caring, protective demeanor. A roast chicken is the ultimate meal of home and family. It presents an image of someone who is a nurturer and a provider of comfort and security.",
    },
    Dish {
        name: "Leo's Royal Feast Salmon",
        description: "A large, impressive side of baked salmon, beautifully garnished with herbs and lemon slices.",
        explanation: "Your {sign} Ascendant is charismatic and loves to be the host. This dish is a dramatic centerpiece, a 'royal' offering for your guests (or yourself!). It's generous, impressive, and puts you in the role of the magnanimous host.",
    },
    Dish {
        name: "Refined Virgo Lemon Herb Fish",
        description: "A delicate white fish, pan-seared with a precise lemon, butter, and herb sauce, served on a bed of wilted spinach.",
        explanation: "Your {sign} Ascendant projects an image of refinement, intelligence, and purity. This is a clean, elegant, and perfectly executed dish. It showcases attention to detail and a mastery of simple, high-quality ingredients.",
    },
    Dish {
        name: "Elegant Libra Scallops",
        description: "Pan-seared scallops served over a bed of risotto, with a balanced and delicate sauce.",
        explanation: "Your {sign} Ascendant is charming, graceful, and has a refined aesthetic. Scallops are an elegant and sophisticated choice. This dish is all about balance, the creamy risotto and the delicate scallops creating a harmonious and beautiful plate.",
    },
    Dish {
        name: "Mysterious Scorpio Black Pasta",
        description: "Squid ink pasta with seafood in a rich, spicy tomato sauce.",
        explanation: "Your {sign} Ascendant has a magnetic and mysterious allure. The dark, dramatic color of the squid ink pasta is visually striking and intriguing. The deep, intense flavors hint at hidden depths, perfectly matching your persona.",
    },
    Dish {
        name: "Worldly Sagittarius Curry",
        description: "An aromatic and flavorful Thai or Indian curry with coconut milk, exotic spices, and plenty of vegetables.",
        explanation: "Your {sign} Ascendant is adventurous, philosophical, and open-minded. A curry, with its complex blend of spices from a faraway land, presents you as a world traveler with a broad perspective and a taste for the exotic.",
    },
    Dish {
        name: "Timeless Capricorn Lamb Chops",
        description: "Perfectly cooked lamb chops with a classic rosemary and garlic crust, served with roasted potatoes.",
        explanation: "Your {sign} Ascendant projects an aura of authority, competence, and timeless class. Lamb chops are a classic, sophisticated, and respected dish. It shows you as someone with discerning taste and an appreciation for enduring quality.",
    },
    Dish {
        name: "Innovative Aquarius Deconstructed Dish",
        description: "A 'deconstructed' shepherd's pie, with a base of lentils and mushrooms, topped with a swirl of potato puree and a separate herb oil.",
        explanation: "Your {sign} Ascendant is unique, intellectual, and a bit quirky. A deconstructed dish is a playful, cerebral take on a classic. It shows you as an innovator who sees the world differently and isn't afraid to break the rules.",
    },
    Dish {
        name: "Poetic Pisces Cioppino",
        description: "A dreamy, savory seafood stew with a variety of fish and shellfish in a tomato-wine broth.",
        explanation: "Your {sign} Ascendant is gentle, artistic, and compassionate. A cioppino is a 'soup of the sea,' a beautiful melding of different elements into one harmonious, soulful dish. It reflects your fluid, go-with-the-flow, and deeply empathetic nature.",
    },
];
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuEntry {
    pub name: String,
    pub description: String,
    pub explanation: String,
    pub keyed_sign: ZodiacSign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyMenu {
    pub breakfast: MenuEntry,
    pub lunch: MenuEntry,
    pub dinner: MenuEntry,
}

fn entry(table: &[Dish; 12], sign: ZodiacSign) -> MenuEntry {
    let dish = &table[sign.index()];
    MenuEntry {
        name: dish.name.to_string(),
        description: dish.description.to_string(),
        explanation: dish.explanation.replace("{sign}", &sign.title()),
        keyed_sign: sign,
    }
}

/// Breakfast follows the Sun, lunch the Moon and dinner the Ascendant.
/// A missing sign falls back to the next one in line, then to a fixed default.
pub fn daily_menu(
    sun: Option<ZodiacSign>,
    moon: Option<ZodiacSign>,
    ascendant: Option<ZodiacSign>,
) -> DailyMenu {
    let breakfast = sun.or(ascendant).unwrap_or(ZodiacSign::Leo);
    let lunch = moon.or(sun).unwrap_or(ZodiacSign::Taurus);
    let dinner = ascendant.or(sun).or(moon).unwrap_or(ZodiacSign::Gemini);
    DailyMenu {
        breakfast: entry(&BREAKFASTS, breakfast),
        lunch: entry(&LUNCHES, lunch),
        dinner: entry(&DINNERS, dinner),
    }
}
